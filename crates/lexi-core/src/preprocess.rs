use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default headword preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC)
        let text: String = text.nfkc().collect();

        // Collapse inner whitespace/newlines to single spaces
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
