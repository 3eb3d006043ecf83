mod part_of_speech;
mod types;

pub use part_of_speech::{ParsePartOfSpeechError, PartOfSpeech};
pub use types::{Card, CardId, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, Example, LanguageCode};
