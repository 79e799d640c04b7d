//! # Request Patterns Module
//!
//! This module contains the regex patterns and word lists used to pick the
//! volume, the document type keywords and the connector words out of a
//! free-text request.

use lazy_static::lazy_static;
use regex::Regex;

use crate::request_types::DocumentType;

/// Number followed by a pages/sheets word ("4 листа", "3 страницы", "5 pages")
pub const PAGES_WORD_PATTERN: &str =
    r"(?i)\b([0-9]+)\s*(?:лист\p{L}*|страниц\p{L}*|pages?|sheets?)\b";

/// Number followed by a short pages abbreviation ("4 л", "3 стр.", "2p")
pub const PAGES_ABBREVIATION_PATTERN: &str = r"(?i)\b([0-9]+)\s*(?:л|стр|pp?)\b\.?";

/// Number followed by a slides word ("12 слайдов", "8 slides")
pub const SLIDES_WORD_PATTERN: &str = r"(?i)\b([0-9]+)\s*(?:слайд\p{L}*|slides?)\b";

/// Any run of digits on word boundaries; callers still check the neighbours
pub const BARE_NUMBER_PATTERN: &str = r"\b([0-9]+)\b";

/// A whole token that only names a volume unit
pub const UNIT_WORD_PATTERN: &str =
    r"(?i)^(?:лист\p{L}*|страниц\p{L}*|слайд\p{L}*|pages?|sheets?|slides?|л|стр|pp?)\.?$";

/// Connector words removed from topics ("про", "на тему", "about", ...)
pub const STOPWORDS: &[&str] = &[
    "про", "обо", "об", "о", "по", "на", "тему", "теме", "тема", "about", "on", "regarding",
    "topic",
];

/// Characters that glue two numbers into a date, time or range ("12.05", "1-2")
pub const NUMERIC_SEPARATORS: &[char] = &['.', ',', '/', ':', '-'];

lazy_static! {
    pub static ref PAGES_WORD_REGEX: Regex =
        Regex::new(PAGES_WORD_PATTERN).expect("Pages word pattern should be valid");
    pub static ref PAGES_ABBREVIATION_REGEX: Regex = Regex::new(PAGES_ABBREVIATION_PATTERN)
        .expect("Pages abbreviation pattern should be valid");
    pub static ref SLIDES_WORD_REGEX: Regex =
        Regex::new(SLIDES_WORD_PATTERN).expect("Slides word pattern should be valid");
    pub static ref BARE_NUMBER_REGEX: Regex =
        Regex::new(BARE_NUMBER_PATTERN).expect("Bare number pattern should be valid");
    pub static ref UNIT_WORD_REGEX: Regex =
        Regex::new(UNIT_WORD_PATTERN).expect("Unit word pattern should be valid");

    /// Whole words containing any document type marker stem
    pub static ref KEYWORD_WORD_REGEX: Regex = {
        let stems: Vec<String> = DocumentType::PRIORITY
            .iter()
            .flat_map(|doc_type| doc_type.markers().iter())
            .map(|stem| regex::escape(stem))
            .collect();
        let pattern = format!(
            r"(?i)[\p{{L}}\p{{N}}_-]*(?:{})[\p{{L}}\p{{N}}_-]*",
            stems.join("|")
        );
        Regex::new(&pattern).expect("Keyword word pattern should be valid")
    };

    /// Stopwords as whole words only, so "о" never bites into "экология"
    pub static ref STOPWORD_REGEX: Regex = {
        let words: Vec<String> = STOPWORDS.iter().map(|word| regex::escape(word)).collect();
        Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|")))
            .expect("Stopword pattern should be valid")
    };
}

/// Check whether a single token is one of the connector words
pub fn is_stopword(token: &str) -> bool {
    let lowered = token.to_lowercase();
    STOPWORDS.iter().any(|word| *word == lowered)
}

/// Check whether a single token contains a document type marker stem
pub fn contains_type_marker(token: &str) -> bool {
    let lowered = token.to_lowercase();
    DocumentType::PRIORITY
        .iter()
        .flat_map(|doc_type| doc_type.markers().iter())
        .any(|stem| lowered.contains(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(!PAGES_WORD_REGEX.as_str().is_empty());
        assert!(!PAGES_ABBREVIATION_REGEX.as_str().is_empty());
        assert!(!SLIDES_WORD_REGEX.as_str().is_empty());
        assert!(!BARE_NUMBER_REGEX.as_str().is_empty());
        assert!(!KEYWORD_WORD_REGEX.as_str().is_empty());
        assert!(!STOPWORD_REGEX.as_str().is_empty());
    }

    #[test]
    fn test_pages_word_inflections() {
        for text in ["4 листа", "1 лист", "10 листов", "3 страницы", "2 pages", "5 Sheets"] {
            assert!(PAGES_WORD_REGEX.is_match(text), "no match for '{text}'");
        }
        assert!(!PAGES_WORD_REGEX.is_match("листа"));
    }

    #[test]
    fn test_abbreviation_needs_word_boundary() {
        assert!(PAGES_ABBREVIATION_REGEX.is_match("4 л"));
        assert!(PAGES_ABBREVIATION_REGEX.is_match("3 стр."));
        assert!(!PAGES_ABBREVIATION_REGEX.is_match("5 лет"));
    }

    #[test]
    fn test_keyword_word_removes_whole_inflected_word() {
        let cleaned = KEYWORD_WORD_REGEX.replace_all("Презентацию про космос", "");
        assert_eq!(cleaned.trim(), "про космос");
    }

    #[test]
    fn test_stopwords_are_whole_words() {
        let cleaned = STOPWORD_REGEX.replace_all("про экологию о природе", "");
        assert_eq!(
            cleaned.split_whitespace().collect::<Vec<_>>().join(" "),
            "экологию природе"
        );
        assert!(is_stopword("Про"));
        assert!(!is_stopword("экология"));
    }

    #[test]
    fn test_contains_type_marker() {
        assert!(contains_type_marker("Реферата"));
        assert!(contains_type_marker("слайды"));
        assert!(!contains_type_marker("математика"));
    }
}
