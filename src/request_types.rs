//! # Request Types Module
//!
//! This module defines the core types produced by request interpretation.

use serde::{Deserialize, Serialize};

/// Category of study document the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// Outline / lecture notes
    #[default]
    Note,
    /// Research paper (реферат)
    ResearchPaper,
    /// Presentation skeleton, sized in slides
    Presentation,
    /// Essay
    Essay,
}

/// Closed range of accepted volumes and the value used when none was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl VolumeLimits {
    /// Saturate a requested volume into the range
    pub fn clamp(&self, requested: u32) -> u32 {
        requested.clamp(self.min, self.max)
    }
}

impl DocumentType {
    /// Detection order: the first type whose marker occurs in the text wins
    pub const PRIORITY: [DocumentType; 4] = [
        DocumentType::Presentation,
        DocumentType::ResearchPaper,
        DocumentType::Essay,
        DocumentType::Note,
    ];

    pub fn volume_limits(self) -> VolumeLimits {
        match self {
            DocumentType::Note => VolumeLimits { min: 1, max: 10, default: 3 },
            DocumentType::ResearchPaper => VolumeLimits { min: 1, max: 10, default: 4 },
            DocumentType::Essay => VolumeLimits { min: 1, max: 10, default: 2 },
            DocumentType::Presentation => VolumeLimits { min: 3, max: 15, default: 10 },
        }
    }

    /// Lower-case keyword stems selecting this type.
    ///
    /// Stems are matched as substrings so inflected forms ("презентацию",
    /// "слайдов") are recognised.
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            DocumentType::Presentation => &["презентац", "слайд", "presentation", "slide"],
            DocumentType::ResearchPaper => &["реферат", "доклад", "research"],
            DocumentType::Essay => &["эссе", "сочинени", "essay"],
            DocumentType::Note => &["конспект", "outline"],
        }
    }

    /// Presentations are measured in slides, everything else in pages
    pub fn is_slide_based(self) -> bool {
        matches!(self, DocumentType::Presentation)
    }

    /// Fluent message id of the display name
    pub fn localization_key(self) -> &'static str {
        match self {
            DocumentType::Note => "doc-type-note",
            DocumentType::ResearchPaper => "doc-type-research-paper",
            DocumentType::Presentation => "doc-type-presentation",
            DocumentType::Essay => "doc-type-essay",
        }
    }

    /// Short ASCII tag used in exported file names
    pub fn file_tag(self) -> &'static str {
        match self {
            DocumentType::Note => "konspekt",
            DocumentType::ResearchPaper => "referat",
            DocumentType::Presentation => "prezentaciya",
            DocumentType::Essay => "esse",
        }
    }
}

/// Structured result of interpreting one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRequest {
    /// Free-text subject, never empty
    pub topic: String,
    pub document_type: DocumentType,
    /// Pages or slides, always inside `document_type.volume_limits()`
    pub volume: u32,
}

impl ParsedRequest {
    /// Unit of `volume`: "slides" for presentations, "pages" otherwise
    pub fn volume_unit_key(&self) -> &'static str {
        if self.document_type.is_slide_based() {
            "unit-slides"
        } else {
            "unit-pages"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_every_type() {
        for doc_type in [
            DocumentType::Note,
            DocumentType::ResearchPaper,
            DocumentType::Presentation,
            DocumentType::Essay,
        ] {
            assert!(DocumentType::PRIORITY.contains(&doc_type));
        }
        assert_eq!(DocumentType::PRIORITY[0], DocumentType::Presentation);
    }

    #[test]
    fn test_volume_defaults_inside_limits() {
        for doc_type in DocumentType::PRIORITY {
            let limits = doc_type.volume_limits();
            assert!(limits.min >= 1);
            assert!(limits.min <= limits.default && limits.default <= limits.max);
        }
    }

    #[test]
    fn test_clamp_saturates() {
        let limits = DocumentType::Presentation.volume_limits();
        assert_eq!(limits.clamp(0), 3);
        assert_eq!(limits.clamp(9999), 15);
        assert_eq!(limits.clamp(12), 12);
    }
}
