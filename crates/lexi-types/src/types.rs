use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PartOfSpeech;

/// ISO 639-1 language code ("en", "fr", ...).
pub type LanguageCode = String;

/// Language of the headwords (the learned language).
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";
/// Language translations are written in (the learner's language).
pub const DEFAULT_TARGET_LANGUAGE: &str = "fr";

/// Opaque card identity, generated once when the card is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An example sentence and its translation, filled in independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub sentence: Option<String>,
    pub translation: Option<String>,
}

impl Example {
    pub fn from_sentence(sentence: impl Into<String>) -> Self {
        Self {
            sentence: Some(sentence.into()),
            translation: None,
        }
    }

    pub fn from_translation(translation: impl Into<String>) -> Self {
        Self {
            sentence: None,
            translation: Some(translation.into()),
        }
    }
}

/// Vocabulary card.
///
/// Fields are filled progressively, so an empty card is valid. The identity
/// can only be read once the card exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub title: String,
    pub part_of_speech: PartOfSpeech,
    pub register: String,
    pub definition: String,
    pub translations: Vec<String>,
    pub examples: Vec<Example>,
}

impl Card {
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self::with_id(CardId::generate(), source_language, target_language)
    }

    /// Rebuilds a card around an identity assigned earlier (e.g. read back from a store).
    pub fn with_id(
        id: CardId,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source_language: source_language.into(),
            target_language: target_language.into(),
            title: String::new(),
            part_of_speech: PartOfSpeech::Any,
            register: String::new(),
            definition: String::new(),
            translations: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE)
    }
}
