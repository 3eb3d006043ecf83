use lexi_types::{Card, Example};

use crate::field::{FieldKind, FieldRef};

const HEADER: &str = "----- Vocabulary Card -----";
const FOOTER: &str = "---------------------------";

const TITLE_WIDTH: usize = 17;
const POS_WIDTH: usize = 9;
const DEFINITION_WIDTH: usize = 47;
const TRANSLATIONS_WIDTH: usize = 20;
const COLUMN_PADDING: usize = 2;

/// What part of the card to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Card,
    Field(FieldRef),
    Examples,
}

pub fn render(card: &Card, section: Section) -> String {
    let mut lines = vec![String::new(), HEADER.to_string(), format!("Title: {}", card.title)];

    match section {
        Section::Card => {
            lines.push(format!("Part Of Speech: {}", part_of_speech(card)));
            if !card.register.is_empty() {
                lines.push(format!("Register: {}", card.register));
            }
            lines.push(format!("Definition: {}", card.definition));
            lines.push(format!("Translations: {}", card.translations.join(", ")));
            lines.push("Examples:".to_string());
            lines.extend(example_lines(&card.examples));
        }
        Section::Examples => {
            lines.push("Examples:".to_string());
            lines.extend(example_lines(&card.examples));
        }
        Section::Field(field) => match field.kind {
            FieldKind::Title => {}
            FieldKind::Definition => {
                lines.push(format!("Part Of Speech: {}", part_of_speech(card)));
                lines.push(format!("Definition: {}", card.definition));
            }
            FieldKind::Translation => {
                lines.push(format!("Translations: {}", card.translations.join(", ")));
            }
            FieldKind::Example | FieldKind::ExampleTranslation => {
                let example = card.examples.get(field.index);
                let sentence = example.and_then(|e| e.sentence.as_deref()).unwrap_or("");
                let translation = example.and_then(|e| e.translation.as_deref()).unwrap_or("");

                lines.push(format!("Example {}: {sentence}", field.index + 1));
                lines.push(format!("Translation: {translation}"));
            }
        },
    }

    lines.push(FOOTER.to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn part_of_speech(card: &Card) -> &'static str {
    if card.part_of_speech.is_any() {
        ""
    } else {
        card.part_of_speech.as_str()
    }
}

fn example_lines(examples: &[Example]) -> impl Iterator<Item = String> + '_ {
    examples.iter().enumerate().map(|(i, e)| {
        format!(
            "\t[{}] {}; {}",
            i + 1,
            e.sentence.as_deref().unwrap_or(""),
            e.translation.as_deref().unwrap_or("")
        )
    })
}

/// Shortens `s` to `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let kept: String = s.chars().take(max).collect();
    format!("{}...", kept.trim_end())
}

/// One aligned summary line per card: title, part of speech, definition, translations.
pub fn format_card_list(cards: &[Card]) -> Vec<String> {
    let rows: Vec<[String; 4]> = cards
        .iter()
        .map(|card| {
            [
                truncate(&card.title, TITLE_WIDTH),
                truncate(part_of_speech(card), POS_WIDTH),
                truncate(&card.definition, DEFINITION_WIDTH),
                truncate(&card.translations.join(", "), TRANSLATIONS_WIDTH),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|[title, pos, definition, translations]| {
            let line = format!(
                "{title:<w0$}{pos:<w1$}{definition:<w2$}{translations}",
                w0 = widths[0] + COLUMN_PADDING,
                w1 = widths[1] + COLUMN_PADDING,
                w2 = widths[2] + COLUMN_PADDING,
            );
            line.trim_end().to_string()
        })
        .collect()
}
