use async_trait::async_trait;
use lexi_core::{DefinitionEntry, Dictionary, LanguageError};
use lexi_types::PartOfSpeech;
use reqwest::{StatusCode, Url};

use crate::mapper::response_to_entries;
use crate::model::EntriesResponse;

const ENTRY_FIELDS: &str = "definitions,domains,examples,pronunciations,registers";

/// Oxford Dictionaries API client (`/api/v2/entries`)
#[derive(Clone)]
pub struct OxfordDictionary {
    client: reqwest::Client,
    base_url: Url,
    app_id: String,
    app_key: String,
    language: String,
}

impl OxfordDictionary {
    pub fn new(
        base_url: &str,
        app_id: String,
        app_key: String,
        language: impl Into<String>,
    ) -> Result<Self, LanguageError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LanguageError::Parse(format!("invalid dictionary url {base_url}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            app_id,
            app_key,
            language: language.into(),
        })
    }

    fn entries_url(&self, word: &str, pos: PartOfSpeech) -> Result<Url, LanguageError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| LanguageError::Parse(format!("invalid dictionary url {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v2", "entries", &self.language, &word.to_lowercase()]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", ENTRY_FIELDS);
            query.append_pair("strictMatch", "false");
            if let Some(category) = lexical_category(pos) {
                query.append_pair("lexicalCategory", category);
            }
        }

        Ok(url)
    }
}

/// Oxford lexical category id for a part of speech, `None` when unconstrained
fn lexical_category(pos: PartOfSpeech) -> Option<&'static str> {
    match pos {
        PartOfSpeech::Any => None,
        PartOfSpeech::PhrasalVerb => Some("phrasal"),
        PartOfSpeech::Idiom => Some("idiomatic"),
        other => Some(other.as_str()),
    }
}

#[async_trait]
impl Dictionary for OxfordDictionary {
    async fn define(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError> {
        if self.app_id.is_empty() || self.app_key.is_empty() {
            return Err(LanguageError::Authentication);
        }

        let url = self.entries_url(word, pos)?;
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .header("app_id", &self.app_id)
            .header("app_key", &self.app_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No dictionary entry for {word}");
            return Ok(Vec::new());
        }

        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(LanguageError::Authentication);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LanguageError::RateLimitExceeded);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LanguageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EntriesResponse = response
            .json()
            .await
            .map_err(|e| LanguageError::Parse(e.to_string()))?;

        Ok(response_to_entries(body))
    }

    fn name(&self) -> &str {
        "Oxford"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> OxfordDictionary {
        OxfordDictionary::new("https://example.org", "id".into(), "key".into(), "en").unwrap()
    }

    #[test]
    fn url_escapes_the_word_and_narrows_category() {
        let url = dictionary().entries_url("To Ace", PartOfSpeech::Verb).unwrap();

        assert_eq!(url.path(), "/api/v2/entries/en/to%20ace");
        let query = url.query().unwrap();
        assert!(query.contains("strictMatch=false"));
        assert!(query.contains("lexicalCategory=verb"));
    }

    #[test]
    fn unconstrained_lookup_has_no_category() {
        let url = dictionary().entries_url("ace", PartOfSpeech::Any).unwrap();
        assert!(!url.query().unwrap().contains("lexicalCategory"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(OxfordDictionary::new("not a url", String::new(), String::new(), "en").is_err());
    }
}
