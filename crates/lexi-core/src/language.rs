use std::fmt;
use std::time::Duration;

use lexi_types::PartOfSpeech;

/// Sentence translation provider
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from the source to the target language.
    /// Every alternative the provider returns is a candidate.
    async fn translate(&self, text: &str) -> Result<Vec<String>, LanguageError>;

    fn name(&self) -> &str;
}

/// Single-word translation provider, aware of part of speech
#[async_trait::async_trait]
pub trait WordTranslator: Send + Sync {
    async fn translate_word(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<WordTranslationEntry>, LanguageError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordTranslationEntry {
    pub translation: String,
    pub part_of_speech: PartOfSpeech,
    /// Short gloss telling senses apart
    pub meaning: String,
}

impl WordTranslationEntry {
    pub fn plain(translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for WordTranslationEntry {
    /// `translation (pos) -- meaning`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.translation)?;

        if !self.part_of_speech.is_any() {
            write!(f, " ({})", self.part_of_speech)?;
        }

        if !self.meaning.is_empty() {
            write!(f, " -- {}", self.meaning)?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("authentication error")]
    Authentication,

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("unsupported: {0}")]
    Unsupported(String),
}
