//! Dialogue Manager module for the request → format choice → delivery flow

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::config::BotConfig;
use crate::content::ContentAssembler;
use crate::delivery::{send_inline, send_txt, DeliveryFormat};
use crate::request_types::ParsedRequest;
use crate::session::SessionStore;

use super::ui_builder::document_type_name;

/// Park a freshly parsed request until the user picks a delivery format
pub fn remember_pending(
    store: &dyn SessionStore,
    user_id: u64,
    request: ParsedRequest,
    language_code: Option<&str>,
) {
    let mut state = store.get(user_id);
    if state.pending.is_some() {
        debug!(user_id, "Replacing previous pending request");
    }
    state.language_code = language_code.map(|s| s.to_string());
    state.set_pending(request);
    store.put(user_id, state);
}

/// Drop the pending request; returns whether there was one
pub fn cancel_pending(store: &dyn SessionStore, user_id: u64) -> bool {
    let mut state = store.get(user_id);
    let cancelled = state.clear_pending();
    store.put(user_id, state);
    cancelled
}

/// Assemble and send the pending request in the chosen format
///
/// Returns `Ok(false)` when nothing was pending (the keyboard was stale).
/// A failed delivery puts the request back so the user can pick again.
pub async fn deliver_pending_request(
    bot: &Bot,
    chat_id: ChatId,
    user_id: u64,
    format: DeliveryFormat,
    store: &Arc<dyn SessionStore>,
    config: &BotConfig,
    language_code: Option<&str>,
) -> Result<bool> {
    let mut state = store.get(user_id);
    let Some(request) = state.take_pending() else {
        debug!(user_id, "No pending request for format choice");
        return Ok(false);
    };
    // Claim the request before any await so a double tap cannot deliver twice
    store.put(user_id, state);

    let type_name = document_type_name(request.document_type, language_code);
    bot.send_message(
        chat_id,
        t_args_lang("generating", &[("type", type_name.as_str())], language_code),
    )
    .await?;

    let document = {
        let mut rng = rand::thread_rng();
        ContentAssembler::with_config(config.content.clone()).assemble(&request, &mut rng)
    };
    debug!(
        user_id,
        sections = document.sections.len(),
        words = document.word_count(),
        "Document assembled"
    );

    let outcome = match format {
        DeliveryFormat::Inline => {
            send_inline(bot, chat_id, &document, config.delivery.max_message_chars)
                .await
                .map(|_| ())
        }
        DeliveryFormat::Txt => {
            let caption = t_args_lang(
                "file-caption",
                &[("type", type_name.as_str()), ("topic", request.topic.as_str())],
                language_code,
            );
            send_txt(bot, chat_id, &document, caption).await
        }
    };

    let mut state = store.get(user_id);
    match outcome {
        Ok(()) => {
            info!(
                user_id,
                document_type = ?request.document_type,
                volume = request.volume,
                format = ?format,
                "Request delivered"
            );
            state.record_delivery(request, format, config.delivery.history_limit);
            store.put(user_id, state);
        }
        Err(e) => {
            error!(user_id, error = %e, format = ?format, "Failed to deliver document");
            if state.pending.is_none() {
                state.set_pending(request);
            } else {
                warn!(user_id, "Newer request arrived during delivery, dropping failed one");
            }
            store.put(user_id, state);
            bot.send_message(chat_id, t_lang("delivery-failed", language_code))
                .await?;
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_types::DocumentType;
    use crate::session::InMemorySessionStore;

    fn request(topic: &str) -> ParsedRequest {
        ParsedRequest {
            topic: topic.to_string(),
            document_type: DocumentType::Essay,
            volume: 2,
        }
    }

    #[test]
    fn test_remember_pending_stores_language() {
        let store = InMemorySessionStore::new();
        remember_pending(&store, 7, request("экология"), Some("en"));

        let state = store.get(7);
        assert_eq!(state.pending, Some(request("экология")));
        assert_eq!(state.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_cancel_pending() {
        let store = InMemorySessionStore::new();
        assert!(!cancel_pending(&store, 7));

        remember_pending(&store, 7, request("экология"), None);
        assert!(cancel_pending(&store, 7));
        assert!(store.get(7).pending.is_none());
    }
}
