use lexi_core::StoreError;
use lexi_types::{Card, CardId, Example, PartOfSpeech};
use serde::{Deserialize, Serialize};

/// On-disk layout of a card
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part_of_speech: String,
    #[serde(default)]
    pub register: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default)]
    pub examples: Vec<ExampleRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExampleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        let part_of_speech = if card.part_of_speech.is_any() {
            String::new()
        } else {
            card.part_of_speech.as_str().to_string()
        };

        Self {
            id: card.id().as_str().to_string(),
            source_language: card.source_language.clone(),
            target_language: card.target_language.clone(),
            title: card.title.clone(),
            part_of_speech,
            register: card.register.clone(),
            definition: card.definition.clone(),
            translations: card.translations.clone(),
            examples: card
                .examples
                .iter()
                .map(|e| ExampleRecord {
                    sentence: e.sentence.clone(),
                    translation: e.translation.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = StoreError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(StoreError::InvalidData("card record has no id".to_string()));
        }

        let part_of_speech = if record.part_of_speech.is_empty() {
            PartOfSpeech::Any
        } else {
            record
                .part_of_speech
                .parse::<PartOfSpeech>()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?
        };

        let mut card = Card::with_id(
            CardId::from(record.id),
            record.source_language,
            record.target_language,
        );
        card.title = record.title;
        card.part_of_speech = part_of_speech;
        card.register = record.register;
        card.definition = record.definition;
        card.translations = record.translations;
        card.examples = record
            .examples
            .into_iter()
            .map(|e| Example {
                sentence: e.sentence,
                translation: e.translation,
            })
            .collect();

        Ok(card)
    }
}

pub fn encode(card: &Card) -> Result<String, StoreError> {
    serde_yaml::to_string(&CardRecord::from(card)).map_err(StoreError::internal)
}

pub fn decode(data: &str) -> Result<Card, StoreError> {
    let record: CardRecord = serde_yaml::from_str(data).map_err(StoreError::internal)?;
    Card::try_from(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_card() -> Card {
        let mut card = Card::new("en", "fr");
        card.title = "to ace".to_string();
        card.part_of_speech = PartOfSpeech::PhrasalVerb;
        card.register = "informal".to_string();
        card.definition = "achieve high marks in (a test or exam)".to_string();
        card.translations = vec!["réussir".to_string(), "cartonner".to_string()];
        card.examples = vec![
            Example {
                sentence: Some("I aced my grammar test".to_string()),
                translation: Some("j'ai cartonné".to_string()),
            },
            Example::from_sentence("he can ace opponents"),
        ];
        card
    }

    #[test]
    fn encoded_card_reads_back_unchanged() {
        let card = full_card();

        let data = encode(&card).unwrap();
        let decoded = decode(&data).unwrap();

        assert_eq!(decoded, card);
        assert_eq!(decoded.id(), card.id());
    }

    #[test]
    fn unconstrained_part_of_speech_is_omitted() {
        let card = Card::new("en", "fr");
        let data = encode(&card).unwrap();

        assert!(!data.contains("part_of_speech"));
        assert_eq!(decode(&data).unwrap().part_of_speech, PartOfSpeech::Any);
    }

    #[test]
    fn record_without_id_is_invalid() {
        let err = decode("title: owl\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn unknown_part_of_speech_is_invalid() {
        let err = decode("id: abc\npart_of_speech: gerund\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn unparsable_yaml_is_internal() {
        let err = decode("id: [unclosed\n").unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }
}
