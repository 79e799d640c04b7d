//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info};

// Import localization
use crate::localization::t_lang;

use crate::config::BotConfig;
use crate::interpreter::interpret;
use crate::session::SessionStore;

// Import dialogue manager functions
use super::dialogue_manager::remember_pending;

// Import UI builder functions
use super::ui_builder::{create_format_keyboard, format_history, format_request_summary};

/// Commands handled directly instead of being interpreted as a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    History,
}

impl BotCommand {
    /// Recognise `/start`, `/help` and `/history`, also in the `/help@my_bot` form
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let command = command.split('@').next().unwrap_or(command);

        match command.to_lowercase().as_str() {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            "history" => Some(BotCommand::History),
            _ => None,
        }
    }
}

/// Welcome text sent on /start (HTML)
pub fn welcome_message(language_code: Option<&str>) -> String {
    format!(
        "👋 <b>{}</b>\n\n{}\n\n{}\n\n{}",
        t_lang("welcome-title", language_code),
        t_lang("welcome-description", language_code),
        t_lang("welcome-example", language_code),
        t_lang("welcome-commands", language_code)
    )
}

/// Usage text sent on /help (HTML)
pub fn help_message(language_code: Option<&str>) -> String {
    format!(
        "ℹ️ <b>{}</b>\n\n{}",
        t_lang("help-title", language_code),
        [
            t_lang("help-description", language_code),
            t_lang("help-types", language_code),
            t_lang("help-volume", language_code),
            t_lang("help-commands", language_code),
        ]
        .join("\n\n")
    )
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    command: BotCommand,
    store: &Arc<dyn SessionStore>,
    config: &BotConfig,
    language_code: Option<&str>,
) -> Result<()> {
    let reply = match command {
        BotCommand::Start => welcome_message(language_code),
        BotCommand::Help => help_message(language_code),
        BotCommand::History => {
            let user_id = msg.from.as_ref().map(|user| user.id.0).unwrap_or_default();
            let state = store.get(user_id);
            format_history(
                state.recent_history(config.delivery.recent_history_shown),
                language_code,
            )
        }
    };

    bot.send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    store: &Arc<dyn SessionStore>,
    config: &BotConfig,
) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    debug!(user_id = %msg.chat.id, chars = text.chars().count(), "Received text message from user");

    if let Some(command) = BotCommand::parse(text) {
        debug!(user_id = %msg.chat.id, command = ?command, "Handling command");
        return handle_command(bot, msg, command, store, config, language_code).await;
    }

    let request = interpret(text);
    info!(
        user_id = %msg.chat.id,
        document_type = ?request.document_type,
        volume = request.volume,
        "Request interpreted"
    );

    let summary = format_request_summary(&request, language_code);
    let user_id = msg.from.as_ref().map(|user| user.id.0).unwrap_or_default();
    remember_pending(&**store, user_id, request, language_code);

    bot.send_message(msg.chat.id, summary)
        .parse_mode(ParseMode::Html)
        .reply_markup(create_format_keyboard(language_code))
        .await?;
    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");

    bot.send_message(msg.chat.id, t_lang("unsupported-message", language_code))
        .await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    store: Arc<dyn SessionStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, &store, &config).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help@konspekt_bot"), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("  /HISTORY "), Some(BotCommand::History));
    }

    #[test]
    fn test_non_commands_are_requests() {
        assert_eq!(BotCommand::parse("реферат про экологию"), None);
        assert_eq!(BotCommand::parse("/essay про осень"), None);
        assert_eq!(BotCommand::parse(""), None);
    }
}
