use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lexi_config::TimeoutConfig;
use lexi_core::{
    CardStore, DefinitionEntry, Dictionary, LanguageError, LanguageService, StoreError, Translator,
};
use lexi_types::{Card, CardId, PartOfSpeech};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::console::{Console, ConsoleError};
use crate::editor::CardEditor;

/// Dictionary answering every lookup with the same entries
pub struct FakeDictionary {
    entries: Vec<DefinitionEntry>,
    queries: Mutex<Vec<(String, PartOfSpeech)>>,
}

impl FakeDictionary {
    pub fn new(entries: Vec<DefinitionEntry>) -> Self {
        Self {
            entries,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, PartOfSpeech)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dictionary for FakeDictionary {
    async fn define(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError> {
        self.queries.lock().unwrap().push((word.to_string(), pos));
        Ok(self.entries.clone())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct FailingDictionary;

#[async_trait]
impl Dictionary for FailingDictionary {
    async fn define(
        &self,
        _word: &str,
        _pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError> {
        Err(LanguageError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Dictionary that never answers in time
pub struct StalledDictionary;

#[async_trait]
impl Dictionary for StalledDictionary {
    async fn define(
        &self,
        _word: &str,
        _pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// Translator with canned answers, unknown texts have no translation
#[derive(Default)]
pub struct FakeTranslator {
    answers: HashMap<String, Vec<String>>,
}

impl FakeTranslator {
    pub fn with(mut self, text: &str, translations: &[&str]) -> Self {
        self.answers.insert(
            text.to_string(),
            translations.iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<Vec<String>, LanguageError> {
        Ok(self.answers.get(text).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<Card>>,
    failing_writes: bool,
}

impl MemoryStore {
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Mutex::new(cards),
            ..Default::default()
        }
    }

    /// Store refusing every create and update, like a full disk
    pub fn failing_writes() -> Self {
        Self {
            failing_writes: true,
            ..Default::default()
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing_writes {
            return Err(StoreError::internal("disk full"));
        }
        Ok(())
    }

    pub fn cards(&self) -> Vec<Card> {
        self.cards.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn create(&self, card: &Card) -> Result<CardId, StoreError> {
        self.check_writable()?;
        let mut cards = self.cards.lock().unwrap();
        if cards.iter().any(|c| c.id() == card.id()) {
            return Err(StoreError::AlreadyExists);
        }
        cards.push(card.clone());
        Ok(card.id().clone())
    }

    async fn update(&self, card: &Card) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut cards = self.cards.lock().unwrap();
        let slot = cards
            .iter_mut()
            .find(|c| c.id() == card.id())
            .ok_or(StoreError::NotFound)?;
        *slot = card.clone();
        Ok(())
    }

    async fn get(&self, id: &CardId) -> Result<Card, StoreError> {
        let cards = self.cards.lock().unwrap();
        cards
            .iter()
            .find(|c| c.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &CardId) -> Result<(), StoreError> {
        let mut cards = self.cards.lock().unwrap();
        let index = cards
            .iter()
            .position(|c| c.id() == id)
            .ok_or(StoreError::NotFound)?;
        cards.remove(index);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards())
    }
}

#[derive(Debug, Clone)]
pub enum Answer {
    /// Pick the item with this label
    Choose(&'static str),
    /// Pick the item at this position
    Index(usize),
    /// Type this text at a prompt
    Text(&'static str),
}

/// Console replaying scripted answers; running out of answers reads as end of input.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<Answer>>,
    menus: Mutex<Vec<(String, Vec<String>)>>,
    printed: Mutex<Vec<String>>,
    interrupt: CancellationToken,
}

impl ScriptedConsole {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Default::default()
        })
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    /// Label and items of every menu shown so far
    pub fn menus(&self) -> Vec<(String, Vec<String>)> {
        self.menus.lock().unwrap().clone()
    }

    /// Acts as if the user pressed Ctrl-C.
    pub fn interrupt(&self) {
        self.interrupt.cancel();
    }

    pub fn printed(&self) -> String {
        self.printed.lock().unwrap().join("\n")
    }

    fn next_answer(&self) -> Option<Answer> {
        self.answers.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn select(&self, label: &str, items: &[String]) -> Result<usize, ConsoleError> {
        self.menus
            .lock()
            .unwrap()
            .push((label.to_string(), items.to_vec()));

        match self.next_answer() {
            Some(Answer::Choose(name)) => Ok(items
                .iter()
                .position(|item| item == name)
                .unwrap_or_else(|| panic!("{name:?} is not offered by {label:?}: {items:?}"))),
            Some(Answer::Index(index)) => Ok(index),
            Some(answer) => panic!("menu {label:?} got {answer:?}"),
            None => Err(ConsoleError::Eof),
        }
    }

    async fn prompt(&self, label: &str, _default: &str) -> Result<String, ConsoleError> {
        match self.next_answer() {
            Some(Answer::Text(text)) => Ok(text.to_string()),
            Some(answer) => panic!("prompt {label:?} got {answer:?}"),
            None => Err(ConsoleError::Eof),
        }
    }

    async fn interrupted(&self) {
        self.interrupt.cancelled().await
    }

    fn busy(&self, stop: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { stop.cancelled().await })
    }

    fn print(&self, text: &str) {
        self.printed.lock().unwrap().push(text.to_string());
    }
}

/// Noun sense with a short example, verb sense with one long and one short example
pub fn ace_entries() -> Vec<DefinitionEntry> {
    vec![
        DefinitionEntry {
            definition: "a playing card with a single spot on it".to_string(),
            provider: "Oxford University Press".to_string(),
            part_of_speech: PartOfSpeech::Noun,
            examples: vec!["the ace of diamonds".to_string()],
            ..Default::default()
        },
        DefinitionEntry {
            definition: "serve an ace against (an opponent)".to_string(),
            provider: "Oxford University Press".to_string(),
            part_of_speech: PartOfSpeech::Verb,
            examples: vec!["he can ace opponents".to_string(), "ace!".to_string()],
            domains: vec!["tennis".to_string()],
            registers: vec!["informal".to_string()],
        },
    ]
}

pub fn editor(language: LanguageService, store: Arc<dyn CardStore>) -> CardEditor {
    CardEditor::new(language, store, TimeoutConfig::default(), "en", "fr")
}
