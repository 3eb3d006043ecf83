use std::sync::Arc;

use lexi_types::PartOfSpeech;

use crate::preprocess::{DefaultPreprocessor, Preprocessor};
use crate::{DefinitionEntry, Dictionary, LanguageError, Translator, WordTranslationEntry, WordTranslator};

/// Facade over the language providers available for one language pair.
///
/// Any provider may be missing; calls needing it fail with
/// `LanguageError::Unsupported`.
#[derive(Clone, Default)]
pub struct LanguageService {
    dictionary: Option<Arc<dyn Dictionary>>,
    translator: Option<Arc<dyn Translator>>,
    word_translator: Option<Arc<dyn WordTranslator>>,
}

impl LanguageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_word_translator(mut self, word_translator: Arc<dyn WordTranslator>) -> Self {
        self.word_translator = Some(word_translator);
        self
    }

    pub async fn define(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError> {
        let dictionary = self
            .dictionary
            .as_ref()
            .ok_or_else(|| LanguageError::Unsupported("no dictionary configured".to_string()))?;

        let word = DefaultPreprocessor.process(word);
        tracing::debug!(word = %word, pos = %pos, provider = dictionary.name(), "Getting definitions");

        match dictionary.define(&word, pos).await {
            Ok(entries) => {
                tracing::debug!("{} definitions for {word}", entries.len());
                Ok(entries)
            }
            Err(e) => {
                tracing::error!(word = %word, pos = %pos, "Unable to get definitions: {e}");
                Err(e)
            }
        }
    }

    pub async fn translate(&self, text: &str) -> Result<Vec<String>, LanguageError> {
        let translator = self
            .translator
            .as_ref()
            .ok_or_else(|| LanguageError::Unsupported("no translator configured".to_string()))?;

        let text = DefaultPreprocessor.process(text);
        tracing::debug!(text = %text, provider = translator.name(), "Getting translations");

        translator.translate(&text).await.inspect_err(|e| {
            tracing::error!(text = %text, "Unable to translate: {e}");
        })
    }

    /// Word translations. Without a word translator, the sentence translator
    /// is used and its results carry no part of speech nor meaning.
    pub async fn translate_word(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<WordTranslationEntry>, LanguageError> {
        let Some(word_translator) = self.word_translator.as_ref() else {
            let translations = self.translate(word).await?;
            return Ok(translations
                .into_iter()
                .map(WordTranslationEntry::plain)
                .collect());
        };

        let word = DefaultPreprocessor.process(word);
        tracing::debug!(word = %word, pos = %pos, provider = word_translator.name(), "Getting word translations");

        word_translator.translate_word(&word, pos).await.inspect_err(|e| {
            tracing::error!(word = %word, pos = %pos, "Unable to translate word: {e}");
        })
    }
}
