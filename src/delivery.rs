//! # Delivery Module
//!
//! This module sends assembled documents back to the chat: inline, split
//! into messages that fit Telegram's size limit, or as a plain-text file
//! attachment written through a temporary file.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::content::Document;
use crate::delivery_errors::DeliveryError;

const CALLBACK_PREFIX: &str = "format:";
const MAX_FILE_SLUG_CHARS: usize = 40;

/// How the user wants to receive the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryFormat {
    /// Chat messages with HTML formatting
    Inline,
    /// Plain-text `.txt` attachment
    Txt,
}

impl DeliveryFormat {
    pub const ALL: [DeliveryFormat; 2] = [DeliveryFormat::Inline, DeliveryFormat::Txt];

    /// Inline keyboard callback payload, e.g. `format:txt`
    pub fn callback_data(self) -> String {
        let name = match self {
            DeliveryFormat::Inline => "inline",
            DeliveryFormat::Txt => "txt",
        };
        format!("{CALLBACK_PREFIX}{name}")
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data.strip_prefix(CALLBACK_PREFIX)? {
            "inline" => Some(DeliveryFormat::Inline),
            "txt" => Some(DeliveryFormat::Txt),
            _ => None,
        }
    }

    /// Fluent message id of the button label
    pub fn localization_key(self) -> &'static str {
        match self {
            DeliveryFormat::Inline => "format-inline",
            DeliveryFormat::Txt => "format-txt",
        }
    }
}

/// Split text into chunks of at most `max_chars` characters
///
/// Chunks end after the last newline that fits; a single line longer than
/// the limit is cut hard. Concatenating the chunks gives back the input.
///
/// # Examples
///
/// ```rust
/// use konspekt::delivery::split_message;
///
/// let chunks = split_message("первая\nвторая\nтретья", 14);
/// assert_eq!(chunks, vec!["первая\nвторая\n", "третья"]);
/// ```
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    loop {
        // Byte offset just past `max_chars` characters, if the rest is longer
        let Some((limit, _)) = remaining.char_indices().nth(max_chars) else {
            chunks.push(remaining.to_string());
            break;
        };

        let split_at = remaining[..limit]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(limit);

        chunks.push(remaining[..split_at].to_string());
        remaining = &remaining[split_at..];
    }

    chunks
}

/// Display name of the exported file: type tag plus a sanitized topic
pub fn export_file_name(document: &Document) -> String {
    let mut slug = String::new();
    for c in document.topic.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
        if slug.chars().count() >= MAX_FILE_SLUG_CHARS {
            break;
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "document" } else { slug };

    format!("{}_{}.txt", document.document_type.file_tag(), slug)
}

/// A rendered document on disk; the file is deleted when this is dropped
#[derive(Debug)]
pub struct ExportedFile {
    file: NamedTempFile,
    file_name: String,
}

impl ExportedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Write the plain-text rendering of a document to a temporary file
pub fn export_txt(document: &Document) -> Result<ExportedFile, DeliveryError> {
    let mut file = tempfile::Builder::new()
        .prefix("konspekt_")
        .suffix(".txt")
        .tempfile()?;

    let text = document.to_plain_text();
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let exported = ExportedFile {
        file,
        file_name: export_file_name(document),
    };
    debug!(
        temp_path = %exported.path().display(),
        bytes = text.len(),
        "Document exported to temporary file"
    );
    Ok(exported)
}

/// Send the document as HTML chat messages, returning how many were sent
pub async fn send_inline(
    bot: &Bot,
    chat_id: ChatId,
    document: &Document,
    max_chars: usize,
) -> Result<usize, DeliveryError> {
    let mut sent = 0;
    for chunk in split_message(&document.to_html(), max_chars) {
        if chunk.trim().is_empty() {
            continue;
        }
        bot.send_message(chat_id, chunk)
            .parse_mode(ParseMode::Html)
            .await?;
        sent += 1;
    }

    info!(user_id = %chat_id, messages = sent, "Document delivered inline");
    Ok(sent)
}

/// Send the document as a `.txt` attachment
pub async fn send_txt(
    bot: &Bot,
    chat_id: ChatId,
    document: &Document,
    caption: String,
) -> Result<(), DeliveryError> {
    let exported = export_txt(document)?;

    bot.send_document(
        chat_id,
        InputFile::file(exported.path()).file_name(exported.file_name().to_string()),
    )
    .caption(caption)
    .await?;

    info!(user_id = %chat_id, file_name = %exported.file_name(), "Document delivered as file");
    Ok(())
}
