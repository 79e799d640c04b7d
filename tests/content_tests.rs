//! # Content Tests
//!
//! Document assembly from interpreted requests: slide counts, word targets,
//! section layouts per document type and markup-safe rendering.

use konspekt::content::ContentAssembler;
use konspekt::interpreter::interpret;
use konspekt::request_types::{DocumentType, ParsedRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str, document_type: DocumentType, volume: u32) -> ParsedRequest {
        ParsedRequest {
            topic: topic.to_string(),
            document_type,
            volume,
        }
    }

    #[test]
    fn test_presentation_slide_count_matches_volume() {
        let assembler = ContentAssembler::new();
        let mut rng = StdRng::seed_from_u64(11);

        for volume in 3..=15 {
            let document =
                assembler.assemble(&request("космос", DocumentType::Presentation, volume), &mut rng);
            assert_eq!(document.sections.len(), volume as usize);
            assert_eq!(document.target_words, 0);
            assert!(document.sources.is_empty());
            assert!(document.sections[0].heading.starts_with("Слайд 1"));
            assert!(document
                .sections
                .last()
                .unwrap()
                .heading
                .ends_with("Выводы"));
        }
    }

    #[test]
    fn test_page_documents_reach_word_target() {
        let assembler = ContentAssembler::new();
        let mut rng = StdRng::seed_from_u64(5);

        for document_type in [DocumentType::Note, DocumentType::ResearchPaper, DocumentType::Essay] {
            for volume in [1, 4, 10] {
                let document =
                    assembler.assemble(&request("экология", document_type, volume), &mut rng);
                assert_eq!(document.target_words, volume as usize * 300);
                assert!(
                    document.word_count() >= document.target_words,
                    "{:?} x{} has {} words",
                    document_type,
                    volume,
                    document.word_count()
                );
            }
        }
    }

    #[test]
    fn test_research_paper_layout() {
        let document = ContentAssembler::new().assemble(
            &request("экология", DocumentType::ResearchPaper, 4),
            &mut StdRng::seed_from_u64(2),
        );

        let headings: Vec<&str> = document.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings.first(), Some(&"1. Введение"));
        assert_eq!(headings.last(), Some(&"3. Заключение"));
        assert_eq!(headings.len(), 6);
        assert!(headings[1].starts_with("Глава 1."));
        assert_eq!(document.sources.len(), 8);
        assert!(document.title.starts_with("РЕФЕРАТ"));
        assert!(document.title.contains("ЭКОЛОГИЯ"));
    }

    #[test]
    fn test_essay_arguments_are_capped() {
        let document = ContentAssembler::new().assemble(
            &request("дружба", DocumentType::Essay, 10),
            &mut StdRng::seed_from_u64(9),
        );

        let arguments = document
            .sections
            .iter()
            .filter(|section| section.heading.starts_with("Аргумент"))
            .count();
        assert_eq!(arguments, 3);
        assert!(document.sources.is_empty());
    }

    #[test]
    fn test_html_escapes_topic() {
        let document = ContentAssembler::new().assemble(
            &request("<b>теги</b> & символы", DocumentType::Presentation, 3),
            &mut StdRng::seed_from_u64(1),
        );

        let html = document.to_html();
        assert!(html.contains("&lt;b&gt;теги&lt;/b&gt; &amp; символы"));
        assert!(!html.contains("<b>теги</b>"));

        let plain = document.to_plain_text();
        assert!(plain.contains("<b>теги</b> & символы"));
        assert!(plain.ends_with('\n'));
    }

    #[test]
    fn test_interpreted_request_assembles() {
        let request = interpret("презентация про космос 12 слайдов");
        let document = ContentAssembler::new().assemble(&request, &mut StdRng::seed_from_u64(4));

        assert_eq!(document.document_type, DocumentType::Presentation);
        assert_eq!(document.sections.len(), 12);
        assert!(document.to_plain_text().contains("космос"));
    }
}
