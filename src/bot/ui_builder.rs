//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::delivery::DeliveryFormat;
use crate::request_types::{DocumentType, ParsedRequest};
use crate::session::HistoryEntry;

/// Callback payload of the cancel button
pub const CANCEL_CALLBACK: &str = "cancel";

/// Localized display name of a document type
pub fn document_type_name(document_type: DocumentType, language_code: Option<&str>) -> String {
    t_lang(document_type.localization_key(), language_code)
}

/// Format the interpretation result shown before the format choice (HTML)
pub fn format_request_summary(request: &ParsedRequest, language_code: Option<&str>) -> String {
    let volume = request.volume.to_string();
    let topic = html::escape(&request.topic);
    let type_name = document_type_name(request.document_type, language_code);
    let unit = t_lang(request.volume_unit_key(), language_code);

    format!(
        "✅ <b>{}</b>\n\n{}\n\n{}",
        t_lang("request-summary-title", language_code),
        t_args_lang(
            "request-summary",
            &[
                ("topic", topic.as_str()),
                ("type", type_name.as_str()),
                ("volume", volume.as_str()),
                ("unit", unit.as_str()),
            ],
            language_code,
        ),
        t_lang("choose-format", language_code)
    )
}

/// Create inline keyboard with one button per delivery format and a cancel row
pub fn create_format_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    let format_row = DeliveryFormat::ALL
        .iter()
        .map(|format| {
            let icon = match format {
                DeliveryFormat::Inline => "💬",
                DeliveryFormat::Txt => "📄",
            };
            InlineKeyboardButton::callback(
                format!("{} {}", icon, t_lang(format.localization_key(), language_code)),
                format.callback_data(),
            )
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(vec![
        format_row,
        vec![InlineKeyboardButton::callback(
            format!("❌ {}", t_lang("cancel", language_code)),
            CANCEL_CALLBACK.to_string(),
        )],
    ])
}

/// Format the most recent history entries as an HTML message
pub fn format_history<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
    language_code: Option<&str>,
) -> String {
    let lines: Vec<String> = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let index = (i + 1).to_string();
            let date = entry.delivered_at.format("%d.%m.%Y %H:%M").to_string();
            let type_name = document_type_name(entry.request.document_type, language_code);
            let topic = html::escape(&entry.request.topic);
            let volume = entry.request.volume.to_string();
            let unit = t_lang(entry.request.volume_unit_key(), language_code);
            t_args_lang(
                "history-entry",
                &[
                    ("index", index.as_str()),
                    ("date", date.as_str()),
                    ("type", type_name.as_str()),
                    ("topic", topic.as_str()),
                    ("volume", volume.as_str()),
                    ("unit", unit.as_str()),
                ],
                language_code,
            )
        })
        .collect();

    if lines.is_empty() {
        return t_lang("history-empty", language_code);
    }

    format!(
        "🕘 <b>{}</b>\n\n{}",
        t_lang("history-title", language_code),
        lines.join("\n")
    )
}
