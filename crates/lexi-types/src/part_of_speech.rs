use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammatical category of a headword, a definition or a translation.
///
/// `Any` means "unconstrained": lookups are not narrowed and nothing is
/// displayed for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartOfSpeech {
    #[default]
    Any,
    Noun,
    Pronoun,
    Verb,
    PhrasalVerb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
    Idiom,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 11] = [
        PartOfSpeech::Any,
        PartOfSpeech::Noun,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Verb,
        PartOfSpeech::PhrasalVerb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Idiom,
    ];

    pub fn is_any(self) -> bool {
        self == PartOfSpeech::Any
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Any => "any",
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::PhrasalVerb => "phrasal-verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Idiom => "idiom",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part of speech: {0:?}")]
pub struct ParsePartOfSpeechError(pub String);

impl FromStr for PartOfSpeech {
    type Err = ParsePartOfSpeechError;

    /// Accepts the canonical names as well as the spellings dictionary
    /// providers use for lexical categories ("Phrasal verb", "Idiomatic").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        let pos = match normalized.as_str() {
            "" | "any" => PartOfSpeech::Any,
            "noun" => PartOfSpeech::Noun,
            "pronoun" => PartOfSpeech::Pronoun,
            "verb" => PartOfSpeech::Verb,
            "phrasal-verb" | "phrasal" => PartOfSpeech::PhrasalVerb,
            "adjective" => PartOfSpeech::Adjective,
            "adverb" => PartOfSpeech::Adverb,
            "preposition" => PartOfSpeech::Preposition,
            "conjunction" => PartOfSpeech::Conjunction,
            "interjection" => PartOfSpeech::Interjection,
            "idiom" | "idiomatic" => PartOfSpeech::Idiom,
            _ => return Err(ParsePartOfSpeechError(s.to_string())),
        };

        Ok(pos)
    }
}
