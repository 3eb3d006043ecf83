use lexi_core::DefinitionEntry;
use lexi_types::PartOfSpeech;

use crate::model::EntriesResponse;

/// Flattens the response to one entry per sense. Senses without a
/// definition (cross-references) are skipped, and so are sub-senses.
pub fn response_to_entries(response: EntriesResponse) -> Vec<DefinitionEntry> {
    let provider = response.metadata.provider;
    let mut ret = Vec::new();

    for result in response.results {
        for lexical_entry in result.lexical_entries {
            let category = &lexical_entry.lexical_category.text;
            let pos = category.parse::<PartOfSpeech>().unwrap_or_else(|e| {
                tracing::warn!("Unmapped lexical category: {e}");
                PartOfSpeech::Any
            });

            for entry in lexical_entry.entries {
                for sense in entry.senses {
                    let Some(definition) = sense.definitions.into_iter().next() else {
                        continue;
                    };

                    ret.push(DefinitionEntry {
                        definition,
                        provider: provider.clone(),
                        part_of_speech: pos,
                        examples: sense.examples.into_iter().map(|e| e.text).collect(),
                        domains: sense.domains.into_iter().map(|d| d.text.to_lowercase()).collect(),
                        registers: sense
                            .registers
                            .into_iter()
                            .map(|r| r.text.to_lowercase())
                            .collect(),
                    });
                }
            }
        }
    }

    ret
}
