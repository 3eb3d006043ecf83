mod deepl;

pub use deepl::DeeplTranslator;
