use serde::Deserialize;

// JSON structures of the Oxford Dictionaries `entries` endpoint, limited to
// the fields requested by the client.

#[derive(Debug, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub results: Vec<HeadwordResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct HeadwordResult {
    #[serde(rename = "lexicalEntries", default)]
    pub lexical_entries: Vec<LexicalEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LexicalEntry {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(rename = "lexicalCategory")]
    pub lexical_category: IdText,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub senses: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Text>,
    #[serde(default)]
    pub registers: Vec<IdText>,
    #[serde(default)]
    pub domains: Vec<IdText>,
}

#[derive(Debug, Deserialize)]
pub struct IdText {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct Text {
    pub text: String,
}
