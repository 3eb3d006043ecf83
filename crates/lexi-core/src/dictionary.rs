use std::fmt;

use lexi_types::PartOfSpeech;

use crate::LanguageError;

/// Dictionary lookup operations
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Define `word`, narrowed to `pos` unless it is `PartOfSpeech::Any`
    async fn define(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<Vec<DefinitionEntry>, LanguageError>;

    /// Provider name, shown in logs
    fn name(&self) -> &str;
}

/// One sense returned by a dictionary provider. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionEntry {
    pub definition: String,
    pub provider: String,
    pub part_of_speech: PartOfSpeech,
    pub examples: Vec<String>,
    pub domains: Vec<String>,
    pub registers: Vec<String>,
}

impl fmt::Display for DefinitionEntry {
    /// `verb (informal) (sport) -- definition -- provider`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.part_of_speech.is_any() {
            write!(f, "{} ", self.part_of_speech)?;
        }

        if !self.registers.is_empty() {
            write!(f, "({}) ", self.registers.join(", "))?;
        }

        if !self.domains.is_empty() {
            write!(f, "({}) ", self.domains.join(", "))?;
        }

        write!(f, "-- {}", self.definition)?;

        if !self.provider.is_empty() {
            write!(f, " -- {}", self.provider)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_qualifiers_when_present() {
        let entry = DefinitionEntry {
            definition: "serve an ace against".to_string(),
            provider: "Oxford University Press".to_string(),
            part_of_speech: PartOfSpeech::Verb,
            examples: vec![],
            domains: vec!["tennis".to_string()],
            registers: vec!["informal".to_string()],
        };

        assert_eq!(
            entry.to_string(),
            "verb (informal) (tennis) -- serve an ace against -- Oxford University Press"
        );
    }

    #[test]
    fn display_of_bare_entry_is_just_the_definition() {
        let entry = DefinitionEntry {
            definition: "a playing card".to_string(),
            ..Default::default()
        };

        assert_eq!(entry.to_string(), "-- a playing card");
    }
}
