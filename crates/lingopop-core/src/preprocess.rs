use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default term cleanup, the typed spelling is kept
    fn process(&self, text: &str) -> String {
        text.trim().to_string()
    }

    /// Key two terms are compared by. Canonically equivalent spellings
    /// share a key.
    fn key(&self, term: &str) -> String {
        term.trim().nfc().collect()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Comparison key under the default rules
pub fn term_key(term: &str) -> String {
    DefaultPreprocessor.key(term)
}
