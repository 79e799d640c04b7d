//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error, warn};

// Import localization
use crate::localization::t_lang;

use crate::config::BotConfig;
use crate::delivery::DeliveryFormat;
use crate::session::SessionStore;

// Import dialogue manager functions
use super::dialogue_manager::{cancel_pending, deliver_pending_request};

use super::ui_builder::CANCEL_CALLBACK;

/// What a callback payload asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Deliver(DeliveryFormat),
    Cancel,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data == CANCEL_CALLBACK {
            return Some(CallbackAction::Cancel);
        }
        DeliveryFormat::from_callback_data(data).map(CallbackAction::Deliver)
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<dyn SessionStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    // Always answered, whatever happens below
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    let language_code = q.from.language_code.as_deref();
    let user_id = q.from.id.0;
    let chat_id = q
        .message
        .as_ref()
        .map(|msg| msg.chat().id)
        .unwrap_or(ChatId(user_id as i64));

    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        warn!(user_id = %q.from.id, data = ?q.data, "Unknown callback data");
        return Ok(());
    };

    // The keyboard is single-use
    if let Some(msg) = &q.message {
        if let Err(e) = bot.edit_message_reply_markup(msg.chat().id, msg.id()).await {
            error!(user_id = %q.from.id, error = %e, "Failed to remove format keyboard");
        }
    }

    match action {
        CallbackAction::Cancel => {
            let key = if cancel_pending(&*store, user_id) {
                "request-cancelled"
            } else {
                "request-expired"
            };
            bot.send_message(chat_id, t_lang(key, language_code)).await?;
        }
        CallbackAction::Deliver(format) => {
            let delivered = deliver_pending_request(
                &bot,
                chat_id,
                user_id,
                format,
                &store,
                &config,
                language_code,
            )
            .await?;
            if !delivered {
                bot.send_message(chat_id, t_lang("request-expired", language_code))
                    .await?;
            }
        }
    }

    Ok(())
}
