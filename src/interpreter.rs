//! # Request Interpreter Module
//!
//! This module turns a raw chat message such as `"реферат про экологию 4 листа"`
//! into a [`ParsedRequest`]: the document type, the requested volume and the
//! remaining topic text.
//!
//! ## Pipeline
//!
//! The input is never rewritten between passes:
//!
//! 1. Detect the document type from keyword stems in fixed priority order
//!    (presentation, research paper, essay, note).
//! 2. Find the volume token with an ordered list of number patterns and clamp
//!    the value into the range of the detected type.
//! 3. Derive the topic from the original text by cutting out the volume token,
//!    every word carrying a type keyword and the connector stopwords.
//!
//! Interpretation is total: any string, including an empty one or a bare
//! command, yields a valid request filled with defaults.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::config::InterpreterConfig;
use crate::request_patterns::{
    contains_type_marker, is_stopword, BARE_NUMBER_REGEX, KEYWORD_WORD_REGEX,
    NUMERIC_SEPARATORS, PAGES_ABBREVIATION_REGEX, PAGES_WORD_REGEX, SLIDES_WORD_REGEX,
    STOPWORD_REGEX, UNIT_WORD_REGEX,
};
use crate::request_types::{DocumentType, ParsedRequest};

/// Which volume pattern produced a match, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumePattern {
    PagesWord,
    PagesAbbreviation,
    SlidesWord,
    BareNumber,
}

/// A volume found in the request text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeToken {
    /// Parsed number before clamping; saturates at `u32::MAX` on overflow
    pub value: u32,
    /// The matched text, number and unit word together
    pub text: String,
    /// Byte offsets of the match in the scanned text
    pub start: usize,
    pub end: usize,
    pub pattern: VolumePattern,
}

/// Interpreter for free-text study document requests
#[derive(Debug, Clone, Default)]
pub struct RequestInterpreter {
    config: InterpreterConfig,
}

lazy_static! {
    static ref DEFAULT_INTERPRETER: RequestInterpreter = RequestInterpreter::new();
}

/// Interpret a request with the default configuration
///
/// # Examples
///
/// ```rust
/// use konspekt::interpreter::interpret;
/// use konspekt::request_types::DocumentType;
///
/// let request = interpret("реферат про экологию 4 листа");
/// assert_eq!(request.document_type, DocumentType::ResearchPaper);
/// assert_eq!(request.volume, 4);
/// assert_eq!(request.topic, "экологию");
/// ```
pub fn interpret(raw_text: &str) -> ParsedRequest {
    DEFAULT_INTERPRETER.interpret(raw_text)
}

impl RequestInterpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Create an interpreter with custom topic limits and fallback
    ///
    /// # Examples
    ///
    /// ```rust
    /// use konspekt::config::InterpreterConfig;
    /// use konspekt::interpreter::RequestInterpreter;
    ///
    /// let config = InterpreterConfig {
    ///     max_topic_length: 20,
    ///     ..Default::default()
    /// };
    /// let interpreter = RequestInterpreter::with_config(config);
    /// assert!(interpreter.interpret("очень длинная тема про историю древнего мира").topic.chars().count() <= 20);
    /// ```
    pub fn with_config(config: InterpreterConfig) -> Self {
        debug!(
            "Creating RequestInterpreter: fallback='{}', topic_length={}..={}, bare_digits={}",
            config.fallback_topic,
            config.min_topic_length,
            config.max_topic_length,
            config.bare_number_max_digits
        );
        Self { config }
    }

    /// Interpret a raw user message
    pub fn interpret(&self, raw_text: &str) -> ParsedRequest {
        let body = strip_command(raw_text);

        let document_type = self.detect_document_type(body);
        let limits = document_type.volume_limits();

        let volume_token = self.extract_volume(body, document_type);
        let volume = match &volume_token {
            Some(token) => limits.clamp(token.value),
            None => limits.default,
        };

        let topic = self.extract_topic(raw_text, body, volume_token.as_ref());

        debug!(
            "Interpreted request: type={:?}, volume={} (token={:?}), topic='{}'",
            document_type,
            volume,
            volume_token.as_ref().map(|token| token.text.as_str()),
            topic
        );

        ParsedRequest {
            topic,
            document_type,
            volume,
        }
    }

    /// Pick the document type from keyword stems
    ///
    /// The first type in [`DocumentType::PRIORITY`] with a stem occurring
    /// anywhere in the lower-cased text wins; with no stem the type is `Note`.
    pub fn detect_document_type(&self, text: &str) -> DocumentType {
        let lowered = text.to_lowercase();
        DocumentType::PRIORITY
            .into_iter()
            .find(|doc_type| {
                doc_type
                    .markers()
                    .iter()
                    .any(|stem| lowered.contains(stem))
            })
            .unwrap_or_default()
    }

    /// Find the volume token, trying the patterns in order
    ///
    /// Slide counts are only considered for presentations. A bare number
    /// counts only when it stands alone and is short enough to be a volume
    /// rather than a year.
    pub fn extract_volume(&self, text: &str, document_type: DocumentType) -> Option<VolumeToken> {
        let unit_patterns: [(VolumePattern, &Regex); 3] = [
            (VolumePattern::PagesWord, &*PAGES_WORD_REGEX),
            (VolumePattern::PagesAbbreviation, &*PAGES_ABBREVIATION_REGEX),
            (VolumePattern::SlidesWord, &*SLIDES_WORD_REGEX),
        ];

        for (pattern, regex) in unit_patterns {
            if pattern == VolumePattern::SlidesWord && !document_type.is_slide_based() {
                continue;
            }
            if let Some(captures) = regex.captures(text) {
                let (Some(whole), Some(number)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                trace!("Volume pattern {:?} matched '{}'", pattern, whole.as_str());
                return Some(VolumeToken {
                    value: parse_saturating(number.as_str()),
                    text: whole.as_str().to_string(),
                    start: whole.start(),
                    end: whole.end(),
                    pattern,
                });
            }
        }

        BARE_NUMBER_REGEX
            .find_iter(text)
            .filter(|number| number.as_str().len() <= self.config.bare_number_max_digits)
            .find(|number| is_standalone_number(text, number.start(), number.end()))
            .map(|number| {
                trace!("Bare number '{}' taken as volume", number.as_str());
                VolumeToken {
                    value: parse_saturating(number.as_str()),
                    text: number.as_str().to_string(),
                    start: number.start(),
                    end: number.end(),
                    pattern: VolumePattern::BareNumber,
                }
            })
    }

    /// Derive the topic from the request body by subtraction
    fn extract_topic(
        &self,
        raw_text: &str,
        body: &str,
        volume_token: Option<&VolumeToken>,
    ) -> String {
        let mut remaining = body.to_string();
        if let Some(token) = volume_token {
            remaining.replace_range(token.start..token.end, " ");
        }

        let without_keywords = KEYWORD_WORD_REGEX.replace_all(&remaining, " ");
        let without_stopwords = STOPWORD_REGEX.replace_all(&without_keywords, " ");

        let collapsed = without_stopwords
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ");
        let topic = collapsed.trim_matches(is_edge_punctuation);

        trace!("Topic after stripping: '{}' -> '{}'", raw_text, topic);

        let topic = if topic.chars().count() < self.config.min_topic_length {
            self.fallback_topic(raw_text)
        } else {
            topic.to_string()
        };

        truncate_topic(&topic, self.config.max_topic_length)
    }

    /// First meaningful token of the original input, or the placeholder
    fn fallback_topic(&self, raw_text: &str) -> String {
        let candidate = raw_text
            .split_whitespace()
            .filter(|token| !token.starts_with('/'))
            .map(|token| token.trim_matches(is_edge_punctuation))
            .find(|token| {
                !token.is_empty()
                    && !token.chars().all(|c| c.is_ascii_digit())
                    && !is_stopword(token)
                    && !contains_type_marker(token)
                    && !UNIT_WORD_REGEX.is_match(token)
            });

        match candidate {
            Some(token) => {
                debug!("Using fallback topic token '{}'", token);
                token.to_string()
            }
            None => {
                debug!("No usable topic in '{}', using placeholder", raw_text);
                self.config.fallback_topic.clone()
            }
        }
    }
}

/// Drop a leading bot command ("/start", "/help@bot") from the text
fn strip_command(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('/') {
        return trimmed;
    }
    match trimmed.find(char::is_whitespace) {
        Some(end) => &trimmed[end..],
        None => "",
    }
}

fn parse_saturating(digits: &str) -> u32 {
    // Only ASCII digits reach here, so overflow is the only failure
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// A number is standalone unless a letter, digit or a separator leading into
/// another alphanumeric run touches it ("2024г", "12.05", "1-2", "5-й")
fn is_standalone_number(text: &str, start: usize, end: usize) -> bool {
    !joins_neighbour(text[..start].chars().rev()) && !joins_neighbour(text[end..].chars())
}

fn joins_neighbour(mut chars: impl Iterator<Item = char>) -> bool {
    match chars.next() {
        Some(c) if c.is_alphanumeric() => true,
        Some(c) if NUMERIC_SEPARATORS.contains(&c) => {
            chars.next().is_some_and(|next| next.is_alphanumeric())
        }
        _ => false,
    }
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '-' | '–' | '—')
}

/// Cut to `max_chars` characters, preferring the last word boundary
fn truncate_topic(topic: &str, max_chars: usize) -> String {
    if topic.chars().count() <= max_chars {
        return topic.to_string();
    }

    let cut: String = topic.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(last_space) if last_space > 0 => &cut[..last_space],
        _ => cut.as_str(),
    };
    cut.trim_matches(is_edge_punctuation).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_interpreter() -> RequestInterpreter {
        RequestInterpreter::new()
    }

    #[test]
    fn test_strip_command() {
        assert_eq!(strip_command("/start"), "");
        assert_eq!(strip_command("  /help@konspekt_bot  "), "  ");
        assert_eq!(strip_command("/go экология").trim(), "экология");
        assert_eq!(strip_command("экология"), "экология");
    }

    #[test]
    fn test_volume_pattern_order() {
        let interpreter = create_interpreter();

        let token = interpreter
            .extract_volume("тема 7 3 листа", DocumentType::Note)
            .unwrap();
        assert_eq!(token.pattern, VolumePattern::PagesWord);
        assert_eq!(token.value, 3);
        assert_eq!(token.text, "3 листа");

        let token = interpreter
            .extract_volume("реферат 5 стр. история", DocumentType::ResearchPaper)
            .unwrap();
        assert_eq!(token.pattern, VolumePattern::PagesAbbreviation);
        assert_eq!(token.text, "5 стр.");
    }

    #[test]
    fn test_slides_only_for_presentations() {
        let interpreter = create_interpreter();

        let token = interpreter
            .extract_volume("12 слайдов", DocumentType::Presentation)
            .unwrap();
        assert_eq!(token.pattern, VolumePattern::SlidesWord);

        let token = interpreter
            .extract_volume("12 слайдов", DocumentType::Note)
            .unwrap();
        assert_eq!(token.pattern, VolumePattern::BareNumber);
        assert_eq!(token.text, "12");
    }

    #[test]
    fn test_bare_number_boundaries() {
        let interpreter = create_interpreter();

        assert!(interpreter.extract_volume("2024г экология", DocumentType::Note).is_none());
        assert!(interpreter.extract_volume("12.05.2024", DocumentType::Note).is_none());
        assert!(interpreter.extract_volume("5-й класс", DocumentType::Note).is_none());
        assert!(interpreter.extract_volume("война 1812 года", DocumentType::Note).is_none());

        let token = interpreter.extract_volume("экология 5.", DocumentType::Note).unwrap();
        assert_eq!(token.value, 5);
    }

    #[test]
    fn test_overflowing_number_saturates() {
        let interpreter = create_interpreter();
        let token = interpreter
            .extract_volume("99999999999999 листов", DocumentType::Note)
            .unwrap();
        assert_eq!(token.value, u32::MAX);
    }

    #[test]
    fn test_truncate_topic_at_word_boundary() {
        assert_eq!(truncate_topic("история древнего мира", 12), "история");
        assert_eq!(truncate_topic("экология", 100), "экология");
        assert_eq!(truncate_topic("абвгдежзий", 4), "абвг");
    }

    #[test]
    fn test_fallback_skips_noise_tokens() {
        let interpreter = create_interpreter();
        assert_eq!(interpreter.fallback_topic("/start 4 листа про"), "общая тема");
        assert_eq!(interpreter.fallback_topic("реферат 3 Я"), "Я");
    }
}
