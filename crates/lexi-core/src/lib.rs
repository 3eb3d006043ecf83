pub mod dictionary;
pub mod language;
pub mod preprocess;
pub mod service;
pub mod store;

pub use dictionary::{DefinitionEntry, Dictionary};
pub use language::{LanguageError, Translator, WordTranslationEntry, WordTranslator};
pub use service::LanguageService;
pub use store::{CardStore, StoreError};
