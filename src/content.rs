//! # Content Assembly Module
//!
//! This module expands a [`ParsedRequest`] into a templated study document.
//! The number of sections (or slides) scales with the requested volume and
//! the section layout is chosen by document type. Page-based documents are
//! filled with template paragraphs until they reach roughly 300 words per
//! requested page.
//!
//! Randomness is injected so callers (and tests) control the output.

use chrono::{DateTime, Local};
use log::{debug, trace};
use rand::Rng;
use teloxide::utils::html;

use crate::config::ContentConfig;
use crate::request_types::{DocumentType, ParsedRequest};

const SENTENCE_TEMPLATES: &[&str] = &[
    "Тема «{topic}» представляет собой важный предмет для исследования.",
    "Изучение темы «{topic}» позволяет рассмотреть различные аспекты и подходы.",
    "Историческое развитие темы «{topic}» оказало значительное влияние на науку.",
    "В современном контексте тема «{topic}» приобретает новые значения.",
    "Теоретические основы изучения темы «{topic}» включают различные методологии.",
    "Практическое применение знаний по теме «{topic}» имеет широкий спектр.",
    "Анализ темы «{topic}» требует комплексного подхода.",
    "Исследование темы «{topic}» открывает новые перспективы.",
    "Ключевые аспекты темы «{topic}» требуют детального рассмотрения.",
    "Значение темы «{topic}» в современном мире постоянно возрастает.",
];

/// Phrase swaps applied at random to vary repeated sentences
const SENTENCE_VARIATIONS: &[(&str, &str)] = &[
    ("представляет собой", "является"),
    ("позволяет", "даёт возможность"),
    ("включают", "содержат"),
    ("требует", "нуждается в"),
    ("открывает", "предоставляет"),
    ("постоянно", "неуклонно"),
];

const CONCLUSION_LEAD: &[&str] = &[
    "В результате рассмотрения темы «{topic}» можно сделать следующие выводы.",
    "Тема «{topic}» является комплексной и многогранной и требует дальнейшего изучения.",
    "Полученные знания по теме «{topic}» могут быть применены в различных сферах деятельности.",
];

const RESEARCH_CHAPTERS: &[&str] = &[
    "Теоретические основы",
    "Историческое развитие",
    "Современное состояние",
    "Практическое применение",
    "Проблемы и перспективы",
];

const SLIDE_TITLES: &[&str] = &[
    "Введение в тему",
    "Основные понятия",
    "История вопроса",
    "Ключевые факты",
    "Современное состояние",
    "Примеры и практика",
    "Проблемы и вызовы",
    "Перспективы развития",
    "Интересные факты",
    "Сравнительный анализ",
    "Роль в обществе",
    "Методы изучения",
];

const SLIDE_BULLETS: &[&str] = &[
    "Определение и суть темы «{topic}»",
    "Основные характеристики и признаки",
    "Важные даты и события",
    "Ключевые исследователи и их вклад",
    "Статистика и цифры",
    "Примеры из практики",
    "Связь с другими областями знаний",
    "Актуальные вопросы и дискуссии",
    "Практическая значимость",
    "Возможные направления развития",
];

const SOURCES: &[&str] = &[
    "Научные исследования и публикации",
    "Учебные пособия и монографии",
    "Статьи в научных журналах",
    "Материалы конференций",
    "Интернет-ресурсы",
    "Архивные материалы",
    "Статистические данные",
    "Международные исследования",
];

/// One titled block of a document (a chapter, or a slide for presentations)
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

/// A fully assembled study document
#[derive(Debug, Clone)]
pub struct Document {
    pub document_type: DocumentType,
    pub topic: String,
    pub volume: u32,
    pub title: String,
    pub sections: Vec<Section>,
    pub sources: Vec<String>,
    /// Word count aimed for; zero for presentations
    pub target_words: usize,
    pub generated_at: DateTime<Local>,
}

impl Document {
    /// Number of words across all section paragraphs
    pub fn word_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| section.paragraphs.iter())
            .map(|paragraph| paragraph.split_whitespace().count())
            .sum()
    }

    fn volume_label(&self) -> String {
        if self.document_type.is_slide_based() {
            format!("{} слайд(ов)", self.volume)
        } else {
            format!("{} лист(а/ов) А4", self.volume)
        }
    }

    /// Render for Telegram's HTML parse mode
    pub fn to_html(&self) -> String {
        let mut lines = vec![
            format!("📚 <b>{}</b>", html::escape(&self.title)),
            format!("📊 <b>Объём:</b> {}", self.volume_label()),
            format!(
                "📅 <b>Дата:</b> {}",
                self.generated_at.format("%d.%m.%Y %H:%M")
            ),
            String::new(),
        ];

        for section in &self.sections {
            lines.push(format!("<b>{}</b>", html::escape(&section.heading)));
            for paragraph in &section.paragraphs {
                lines.push(html::escape(paragraph));
            }
            lines.push(String::new());
        }

        if !self.sources.is_empty() {
            lines.push("<b>📚 ИСТОЧНИКИ:</b>".to_string());
            for (i, source) in self.sources.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, html::escape(source)));
            }
            lines.push(String::new());
        }

        if self.target_words > 0 {
            lines.push(format!(
                "<i>Фактический объём: {} слов, целевой: {} слов</i>",
                self.word_count(),
                self.target_words
            ));
        }

        lines.join("\n").trim_end().to_string()
    }

    /// Render as plain text for file export
    pub fn to_plain_text(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            format!("Объём: {}", self.volume_label()),
            format!("Дата: {}", self.generated_at.format("%d.%m.%Y %H:%M")),
            String::new(),
        ];

        for section in &self.sections {
            lines.push(section.heading.clone());
            lines.push("-".repeat(section.heading.chars().count()));
            lines.extend(section.paragraphs.iter().cloned());
            lines.push(String::new());
        }

        if !self.sources.is_empty() {
            lines.push("ИСТОЧНИКИ".to_string());
            for (i, source) in self.sources.iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, source));
            }
        }

        let mut text = lines.join("\n").trim_end().to_string();
        text.push('\n');
        text
    }
}

/// Assembler turning parsed requests into documents
#[derive(Debug, Clone, Default)]
pub struct ContentAssembler {
    config: ContentConfig,
}

impl ContentAssembler {
    pub fn new() -> Self {
        Self::with_config(ContentConfig::default())
    }

    pub fn with_config(config: ContentConfig) -> Self {
        Self { config }
    }

    /// Assemble a document for the request
    ///
    /// # Examples
    ///
    /// ```rust
    /// use konspekt::content::ContentAssembler;
    /// use konspekt::interpreter::interpret;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let request = interpret("презентация про космос 5 слайдов");
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let document = ContentAssembler::new().assemble(&request, &mut rng);
    /// assert_eq!(document.sections.len(), 5);
    /// ```
    pub fn assemble<R: Rng + ?Sized>(&self, request: &ParsedRequest, rng: &mut R) -> Document {
        debug!(
            "Assembling {:?} of volume {} for topic '{}'",
            request.document_type, request.volume, request.topic
        );

        let (sections, target_words) = match request.document_type {
            DocumentType::Presentation => (self.presentation_slides(request, rng), 0),
            DocumentType::Note => {
                let headings = (1..=request.volume.min(self.config.max_main_sections))
                    .map(|n| format!("2.{n}. Раздел {n}"))
                    .collect();
                self.text_sections(request, headings, rng)
            }
            DocumentType::ResearchPaper => {
                let headings = RESEARCH_CHAPTERS
                    .iter()
                    .take(request.volume.min(self.config.max_main_sections) as usize)
                    .enumerate()
                    .map(|(i, chapter)| format!("Глава {}. {}", i + 1, chapter))
                    .collect();
                self.text_sections(request, headings, rng)
            }
            DocumentType::Essay => {
                let headings = (1..=request.volume.min(self.config.max_essay_arguments))
                    .map(|n| format!("Аргумент {n}"))
                    .collect();
                self.text_sections(request, headings, rng)
            }
        };

        let sources = match request.document_type {
            DocumentType::Note | DocumentType::ResearchPaper => SOURCES
                .iter()
                .take((request.volume as usize * 2).min(self.config.max_sources))
                .map(|source| source.to_string())
                .collect(),
            DocumentType::Essay | DocumentType::Presentation => Vec::new(),
        };

        let document = Document {
            document_type: request.document_type,
            topic: request.topic.clone(),
            volume: request.volume,
            title: format!(
                "{}: {}",
                type_label(request.document_type),
                request.topic.to_uppercase()
            ),
            sections,
            sources,
            target_words,
            generated_at: Local::now(),
        };

        debug!(
            "Assembled document with {} sections and {} words",
            document.sections.len(),
            document.word_count()
        );
        document
    }

    /// Introduction, the given main sections and a conclusion, each filled to
    /// an equal share of the word target
    fn text_sections<R: Rng + ?Sized>(
        &self,
        request: &ParsedRequest,
        main_headings: Vec<String>,
        rng: &mut R,
    ) -> (Vec<Section>, usize) {
        let target_words = request.volume as usize * self.config.words_per_page;
        let share = target_words.div_ceil(main_headings.len() + 2);
        let topic = request.topic.as_str();

        let mut sections = Vec::with_capacity(main_headings.len() + 2);
        sections.push(Section {
            heading: "1. Введение".to_string(),
            paragraphs: generate_paragraphs(topic, share, rng),
        });
        for heading in main_headings {
            sections.push(Section {
                heading,
                paragraphs: generate_paragraphs(topic, share, rng),
            });
        }

        let lead = CONCLUSION_LEAD
            .iter()
            .map(|sentence| fill(sentence, topic))
            .collect::<Vec<_>>()
            .join(" ");
        let lead_words = lead.split_whitespace().count();
        let mut conclusion = vec![lead];
        conclusion.extend(generate_paragraphs(
            topic,
            share.saturating_sub(lead_words),
            rng,
        ));
        sections.push(Section {
            heading: "3. Заключение".to_string(),
            paragraphs: conclusion,
        });

        (sections, target_words)
    }

    /// Exactly `volume` slides: title, plan, content slides and a closing slide
    fn presentation_slides<R: Rng + ?Sized>(
        &self,
        request: &ParsedRequest,
        rng: &mut R,
    ) -> Vec<Section> {
        let topic = request.topic.as_str();
        let content_count = (request.volume as usize).saturating_sub(3);

        let content_titles: Vec<String> = (0..content_count)
            .map(|i| match SLIDE_TITLES.get(i) {
                Some(title) => title.to_string(),
                None => format!("Дополнительный материал {}", i + 1 - SLIDE_TITLES.len()),
            })
            .collect();

        let mut slides = Vec::with_capacity(request.volume as usize);
        slides.push(Section {
            heading: "Слайд 1. Титульный".to_string(),
            paragraphs: vec![
                fill("Тема: «{topic}»", topic),
                "Подготовил(а): ____________".to_string(),
            ],
        });

        let mut plan: Vec<String> = content_titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!("{}. {}", i + 1, title))
            .collect();
        plan.push(format!("{}. Выводы", content_titles.len() + 1));
        slides.push(Section {
            heading: "Слайд 2. План".to_string(),
            paragraphs: plan,
        });

        for (i, title) in content_titles.iter().enumerate() {
            let bullet_count = rng.gen_range(3..=4);
            let mut bullets: Vec<String> = Vec::with_capacity(bullet_count);
            while bullets.len() < bullet_count {
                let bullet = format!("• {}", fill(pick(SLIDE_BULLETS, rng), topic));
                if !bullets.contains(&bullet) {
                    bullets.push(bullet);
                }
            }
            slides.push(Section {
                heading: format!("Слайд {}. {}", i + 3, title),
                paragraphs: bullets,
            });
        }

        slides.push(Section {
            heading: format!("Слайд {}. Выводы", request.volume),
            paragraphs: vec![
                fill("• Тема «{topic}» актуальна и многогранна", topic),
                "• Рассмотрены ключевые аспекты и примеры".to_string(),
                "Спасибо за внимание!".to_string(),
            ],
        });

        trace!("Built {} slides for '{}'", slides.len(), topic);
        slides
    }
}

fn type_label(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::Note => "КОНСПЕКТ",
        DocumentType::ResearchPaper => "РЕФЕРАТ",
        DocumentType::Presentation => "ПРЕЗЕНТАЦИЯ",
        DocumentType::Essay => "ЭССЕ",
    }
}

fn fill(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}

fn pick<'a, R: Rng + ?Sized>(items: &[&'a str], rng: &mut R) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Paragraphs of 3–6 template sentences until `target_words` is reached
fn generate_paragraphs<R: Rng + ?Sized>(
    topic: &str,
    target_words: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut words = 0;

    while words < target_words {
        let sentence_count = rng.gen_range(3..=6);
        let paragraph = (0..sentence_count)
            .map(|_| {
                let mut sentence = fill(pick(SENTENCE_TEMPLATES, rng), topic);
                if rng.gen_bool(0.3) {
                    let (from, to) = SENTENCE_VARIATIONS[rng.gen_range(0..SENTENCE_VARIATIONS.len())];
                    sentence = sentence.replace(from, to);
                }
                sentence
            })
            .collect::<Vec<_>>()
            .join(" ");

        words += paragraph.split_whitespace().count();
        paragraphs.push(paragraph);
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(document_type: DocumentType, volume: u32) -> ParsedRequest {
        ParsedRequest {
            topic: "экология".to_string(),
            document_type,
            volume,
        }
    }

    #[test]
    fn test_generate_paragraphs_reaches_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let paragraphs = generate_paragraphs("экология", 120, &mut rng);
        let words: usize = paragraphs.iter().map(|p| p.split_whitespace().count()).sum();
        assert!(words >= 120);
        assert!(paragraphs.iter().all(|p| p.contains("экология")));
    }

    #[test]
    fn test_generate_paragraphs_zero_target() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_paragraphs("экология", 0, &mut rng).is_empty());
    }

    #[test]
    fn test_note_sections_scale_with_volume() {
        let assembler = ContentAssembler::new();
        let mut rng = StdRng::seed_from_u64(3);

        let small = assembler.assemble(&request(DocumentType::Note, 1), &mut rng);
        let large = assembler.assemble(&request(DocumentType::Note, 8), &mut rng);

        assert_eq!(small.sections.len(), 3); // intro + 1 + conclusion
        assert_eq!(large.sections.len(), 7); // intro + 5 + conclusion
        assert_eq!(small.sources.len(), 2);
        assert_eq!(large.sources.len(), 8);
    }

    #[test]
    fn test_same_seed_same_document() {
        let assembler = ContentAssembler::new();
        let first = assembler.assemble(
            &request(DocumentType::Essay, 2),
            &mut StdRng::seed_from_u64(42),
        );
        let second = assembler.assemble(
            &request(DocumentType::Essay, 2),
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(first.sections, second.sections);
    }
}
