use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lexi_config::TimeoutConfig;
use lexi_core::{
    CardStore, DefinitionEntry, LanguageError, LanguageService, StoreError, WordTranslationEntry,
};
use lexi_types::{Card, Example};

use crate::field::{FieldKind, FieldRef};
use crate::template::{self, Section};

/// Minimum word count for a dictionary example to be copied onto the card
const MIN_EXAMPLE_WORDS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("failed to get definitions: {0}")]
    Definitions(#[source] LanguageError),

    #[error("failed to get translations: {0}")]
    Translations(#[source] LanguageError),

    #[error("failed to get sentences: {0}")]
    Sentences(#[source] LanguageError),

    #[error("propositions are not implemented for {0}")]
    NotImplemented(FieldKind),

    #[error("index {index} is out of range for {field} ({len} elements)")]
    IndexOutOfRange {
        field: FieldKind,
        index: usize,
        len: usize,
    },

    #[error("no propositions available for {0}")]
    NoPropositions(FieldKind),

    #[error("nothing to translate for {0}")]
    EmptySource(FieldKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Propositions fetched for one lookup key
struct Cached<T> {
    key: String,
    values: Vec<T>,
}

impl<T> Cached<T> {
    fn get<'a>(slot: &'a Option<Cached<T>>, key: &str) -> Option<&'a [T]> {
        slot.as_ref()
            .filter(|cached| cached.key == key)
            .map(|cached| cached.values.as_slice())
    }
}

/// Whether a lookup may be answered from the last fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Fresh,
    Cached,
}

#[derive(Default)]
struct PropositionCache {
    definitions: Option<Cached<DefinitionEntry>>,
    translations: Option<Cached<WordTranslationEntry>>,
    example_translations: Option<Cached<String>>,
}

/// Mutation and lookup surface over the card being edited.
///
/// Showing propositions always queries the providers. The list shown is kept
/// per field kind so that applying a choice reads the same list.
pub struct CardEditor {
    card: Card,
    language: LanguageService,
    store: Arc<dyn CardStore>,
    timeouts: TimeoutConfig,
    source_language: String,
    target_language: String,
    cache: PropositionCache,
}

impl CardEditor {
    pub fn new(
        language: LanguageService,
        store: Arc<dyn CardStore>,
        timeouts: TimeoutConfig,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        let source_language = source_language.into();
        let target_language = target_language.into();

        Self {
            card: Card::new(source_language.clone(), target_language.clone()),
            language,
            store,
            timeouts,
            source_language,
            target_language,
            cache: PropositionCache::default(),
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn set_card(&mut self, card: Card) {
        tracing::debug!(id = %card.id(), "Editing card {}", card.title);
        self.card = card;
    }

    pub fn reset_card(&mut self) {
        self.card = Card::new(self.source_language.clone(), self.target_language.clone());
        self.cache = PropositionCache::default();
        tracing::debug!(id = %self.card.id(), "New card");
    }

    /// Persists the card, overwriting the stored copy when it was saved before.
    pub async fn save_card(&self) -> Result<(), EditorError> {
        match self.store.create(&self.card).await {
            Ok(id) => {
                tracing::info!(id = %id, "Card saved");
                Ok(())
            }
            Err(StoreError::AlreadyExists) => {
                self.store.update(&self.card).await?;
                tracing::info!(id = %self.card.id(), "Card updated");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_card(&self) -> Result<(), EditorError> {
        self.store.delete(self.card.id()).await?;
        tracing::info!(id = %self.card.id(), "Card deleted");
        Ok(())
    }

    /// All stored cards; a store failure is logged and yields an empty list.
    pub async fn list_cards(&self) -> Vec<Card> {
        match self.store.list().await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::error!("Failed to list cards: {e}");
                Vec::new()
            }
        }
    }

    pub fn render(&self, section: Section) -> String {
        template::render(&self.card, section)
    }

    /// Current text of a slot. Out of range positions read as empty.
    pub fn get_field(&self, field: FieldRef) -> String {
        let card = &self.card;

        let value = match field.kind {
            FieldKind::Title => Some(card.title.clone()),
            FieldKind::Definition => Some(card.definition.clone()),
            FieldKind::Translation => card.translations.get(field.index).cloned(),
            FieldKind::Example => card
                .examples
                .get(field.index)
                .map(|e| e.sentence.clone().unwrap_or_default()),
            FieldKind::ExampleTranslation => card
                .examples
                .get(field.index)
                .map(|e| e.translation.clone().unwrap_or_default()),
        };

        value.unwrap_or_else(|| {
            let len = self.list_len(field.kind);
            if field.index > len {
                tracing::error!("Invalid index {} for {} ({len} elements)", field.index, field.kind);
            }
            String::new()
        })
    }

    /// Writes `value` into a slot. List slots are overwritten in place, the
    /// slot right after the last element appends.
    pub fn set_field(&mut self, field: FieldRef, value: &str) -> Result<(), EditorError> {
        let len = self.list_len(field.kind);
        if field.kind.is_list() && field.index > len {
            tracing::error!("Invalid index {} for {} ({len} elements)", field.index, field.kind);
            return Err(EditorError::IndexOutOfRange {
                field: field.kind,
                index: field.index,
                len,
            });
        }

        let text = value.to_string();
        let optional = (!value.is_empty()).then(|| text.clone());
        let card = &mut self.card;

        match field.kind {
            FieldKind::Title => card.title = text,
            FieldKind::Definition => card.definition = text,
            FieldKind::Translation => match card.translations.get_mut(field.index) {
                Some(slot) => *slot = text,
                None => card.translations.push(text),
            },
            FieldKind::Example => match card.examples.get_mut(field.index) {
                Some(example) => example.sentence = optional,
                None => card.examples.push(Example {
                    sentence: optional,
                    translation: None,
                }),
            },
            FieldKind::ExampleTranslation => match card.examples.get_mut(field.index) {
                Some(example) => example.translation = optional,
                None => card.examples.push(Example {
                    sentence: None,
                    translation: optional,
                }),
            },
        }

        tracing::debug!("Set {field}");
        Ok(())
    }

    fn list_len(&self, kind: FieldKind) -> usize {
        match kind {
            FieldKind::Title | FieldKind::Definition => 0,
            FieldKind::Translation => self.card.translations.len(),
            FieldKind::Example | FieldKind::ExampleTranslation => self.card.examples.len(),
        }
    }

    /// Candidate values for a slot, as displayed to the user.
    pub async fn get_propositions(&mut self, field: FieldRef) -> Result<Vec<String>, EditorError> {
        let propositions = match field.kind {
            FieldKind::Title => return Err(EditorError::NotImplemented(FieldKind::Title)),
            FieldKind::Definition => self
                .definitions(Lookup::Fresh)
                .await?
                .iter()
                .map(ToString::to_string)
                .collect(),
            FieldKind::Translation => self
                .translations(Lookup::Fresh)
                .await?
                .iter()
                .map(ToString::to_string)
                .collect(),
            FieldKind::Example => self.sentences(Lookup::Fresh).await?,
            FieldKind::ExampleTranslation => self
                .example_translations(field.index, Lookup::Fresh)
                .await?
                .to_vec(),
        };

        tracing::debug!("{} propositions for {field}", propositions.len());
        Ok(propositions)
    }

    /// Applies proposition `choice` of the list last shown for `field`.
    ///
    /// A definition also sets the part of speech and register, and copies
    /// the entry's examples of at least three words onto the card. A
    /// translation is appended. Example propositions fill the addressed slot.
    pub async fn set_proposition(&mut self, field: FieldRef, choice: usize) -> Result<(), EditorError> {
        match field.kind {
            FieldKind::Title => Err(EditorError::NotImplemented(FieldKind::Title)),
            FieldKind::Definition => {
                let entry = pick(self.definitions(Lookup::Cached).await?, FieldKind::Definition, choice)?.clone();
                self.apply_definition(entry);
                Ok(())
            }
            FieldKind::Translation => {
                let entry = pick(self.translations(Lookup::Cached).await?, FieldKind::Translation, choice)?;
                let translation = entry.translation.clone();
                self.card.translations.push(translation);
                Ok(())
            }
            FieldKind::Example => {
                let sentences = self.sentences(Lookup::Cached).await?;
                let sentence = pick(&sentences, FieldKind::Example, choice)?.clone();
                self.set_field(field, &sentence)
            }
            FieldKind::ExampleTranslation => {
                let translations = self
                    .example_translations(field.index, Lookup::Cached)
                    .await?;
                let translation = pick(translations, FieldKind::ExampleTranslation, choice)?.clone();
                self.set_field(field, &translation)
            }
        }
    }

    fn apply_definition(&mut self, entry: DefinitionEntry) {
        let card = &mut self.card;
        card.definition = entry.definition;
        card.part_of_speech = entry.part_of_speech;
        card.register = entry.registers.join(", ");

        for sentence in entry.examples {
            if sentence.split_whitespace().count() < MIN_EXAMPLE_WORDS {
                continue;
            }
            if card.examples.iter().any(|e| e.sentence.as_deref() == Some(sentence.as_str())) {
                continue;
            }
            card.examples.push(Example::from_sentence(sentence));
        }
    }

    fn headword_key(&self) -> String {
        format!("{}|{}", self.card.title, self.card.part_of_speech)
    }

    async fn definitions(&mut self, lookup: Lookup) -> Result<&[DefinitionEntry], EditorError> {
        let key = self.headword_key();

        if lookup == Lookup::Fresh || Cached::get(&self.cache.definitions, &key).is_none() {
            let values = with_timeout(
                self.timeouts.definitions(),
                self.language.define(&self.card.title, self.card.part_of_speech),
            )
            .await
            .map_err(EditorError::Definitions)?;

            self.cache.definitions = Some(Cached { key, values });
        }

        Ok(self
            .cache
            .definitions
            .as_ref()
            .map(|cached| cached.values.as_slice())
            .unwrap_or_default())
    }

    async fn translations(
        &mut self,
        lookup: Lookup,
    ) -> Result<&[WordTranslationEntry], EditorError> {
        let key = self.headword_key();

        if lookup == Lookup::Fresh || Cached::get(&self.cache.translations, &key).is_none() {
            let values = with_timeout(
                self.timeouts.translations(),
                self.language.translate_word(&self.card.title, self.card.part_of_speech),
            )
            .await
            .map_err(EditorError::Translations)?;

            self.cache.translations = Some(Cached { key, values });
        }

        Ok(self
            .cache
            .translations
            .as_ref()
            .map(|cached| cached.values.as_slice())
            .unwrap_or_default())
    }

    /// Example sentences of the headword's dictionary entries, without repeats.
    async fn sentences(&mut self, lookup: Lookup) -> Result<Vec<String>, EditorError> {
        let entries = self.definitions(lookup).await.map_err(|e| match e {
            EditorError::Definitions(source) => EditorError::Sentences(source),
            other => other,
        })?;

        let mut sentences: Vec<String> = Vec::new();
        for sentence in entries.iter().flat_map(|entry| entry.examples.iter()) {
            if !sentences.contains(sentence) {
                sentences.push(sentence.clone());
            }
        }

        Ok(sentences)
    }

    async fn example_translations(
        &mut self,
        index: usize,
        lookup: Lookup,
    ) -> Result<&[String], EditorError> {
        let sentence = self.get_field(FieldRef::example(index));
        if sentence.trim().is_empty() {
            return Err(EditorError::EmptySource(FieldKind::ExampleTranslation));
        }

        if lookup == Lookup::Fresh
            || Cached::get(&self.cache.example_translations, &sentence).is_none()
        {
            let values = with_timeout(self.timeouts.translations(), self.language.translate(&sentence))
                .await
                .map_err(EditorError::Translations)?;

            self.cache.example_translations = Some(Cached {
                key: sentence,
                values,
            });
        }

        Ok(self
            .cache
            .example_translations
            .as_ref()
            .map(|cached| cached.values.as_slice())
            .unwrap_or_default())
    }
}

fn pick<T>(values: &[T], field: FieldKind, choice: usize) -> Result<&T, EditorError> {
    if values.is_empty() {
        return Err(EditorError::NoPropositions(field));
    }

    values.get(choice).ok_or(EditorError::IndexOutOfRange {
        field,
        index: choice,
        len: values.len(),
    })
}

async fn with_timeout<T, F>(limit: Duration, lookup: F) -> Result<T, LanguageError>
where
    F: Future<Output = Result<T, LanguageError>>,
{
    tokio::time::timeout(limit, lookup)
        .await
        .map_err(|_| LanguageError::Timeout(limit))?
}
