//! # Delivery Tests
//!
//! Message splitting against Telegram's size limit and plain-text export
//! through temporary files.

use konspekt::config::TELEGRAM_MESSAGE_LIMIT;
use konspekt::content::ContentAssembler;
use konspekt::delivery::{export_file_name, export_txt, split_message, DeliveryFormat};
use konspekt::delivery_errors::DeliveryError;
use konspekt::request_types::{DocumentType, ParsedRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

#[cfg(test)]
mod tests {
    use super::*;

    fn document(topic: &str, document_type: DocumentType, volume: u32) -> konspekt::content::Document {
        let request = ParsedRequest {
            topic: topic.to_string(),
            document_type,
            volume,
        };
        ContentAssembler::new().assemble(&request, &mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn test_split_respects_limit_and_round_trips() {
        let text = document("экология", DocumentType::ResearchPaper, 10).to_html();
        assert!(text.chars().count() > TELEGRAM_MESSAGE_LIMIT);

        let chunks = split_message(&text, TELEGRAM_MESSAGE_LIMIT);
        assert!(chunks.len() > 1);
        assert!(chunks
            .iter()
            .all(|chunk| chunk.chars().count() <= TELEGRAM_MESSAGE_LIMIT));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_prefers_line_breaks() {
        let text = format!("{}\n{}", "а".repeat(30), "б".repeat(30));
        let chunks = split_message(&text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with('\n'));
        assert_eq!(chunks[1], "б".repeat(30));
    }

    #[test]
    fn test_split_never_breaks_multibyte_chars() {
        let text = "ёжик🙂".repeat(100);
        for limit in [1, 3, 7, 50] {
            let chunks = split_message(&text, limit);
            assert_eq!(chunks.concat(), text);
            assert!(chunks.iter().all(|chunk| chunk.chars().count() <= limit));
        }
    }

    #[test]
    fn test_export_txt_writes_plain_text() {
        let document = document("история Рима", DocumentType::Essay, 2);

        let exported = export_txt(&document).unwrap();
        let path = exported.path().to_path_buf();
        let contents = fs::read_to_string(&path).unwrap();

        assert_eq!(contents, document.to_plain_text());
        assert!(!contents.contains("<b>"));
        assert_eq!(exported.file_name(), "esse_история_рима.txt");

        drop(exported);
        assert!(!path.exists());
    }

    #[test]
    fn test_export_file_name_sanitizes_topic() {
        let document = document("C++ / Rust: сравнение!", DocumentType::Presentation, 3);
        assert_eq!(export_file_name(&document), "prezentaciya_c_rust_сравнение.txt");

        let document = document_with_symbols_only();
        assert_eq!(export_file_name(&document), "konspekt_document.txt");
    }

    fn document_with_symbols_only() -> konspekt::content::Document {
        document("!!! ???", DocumentType::Note, 1)
    }

    #[test]
    fn test_delivery_format_labels() {
        assert_eq!(DeliveryFormat::Inline.callback_data(), "format:inline");
        assert_eq!(DeliveryFormat::Txt.callback_data(), "format:txt");
        assert_eq!(DeliveryFormat::Txt.localization_key(), "format-txt");
    }

    #[test]
    fn test_io_error_converts_to_delivery_error() {
        let error: DeliveryError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(error, DeliveryError::Io(_)));
        assert!(error.to_string().contains("read-only"));
    }
}
