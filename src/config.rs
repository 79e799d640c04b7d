//! # Configuration Module
//!
//! This module defines configuration structures for request interpretation,
//! document assembly and delivery, plus the runtime settings loaded from the
//! environment.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use url::Url;

// Constants for request interpretation
pub const DEFAULT_TOPIC: &str = "общая тема";
pub const MIN_TOPIC_LENGTH: usize = 2;
pub const MAX_TOPIC_LENGTH: usize = 100;
pub const BARE_NUMBER_MAX_DIGITS: usize = 2;

// Constants for document assembly
pub const WORDS_PER_PAGE: usize = 300; // 1 A4 page ≈ 300 words
pub const MAX_MAIN_SECTIONS: u32 = 5;
pub const MAX_ESSAY_ARGUMENTS: u32 = 3;
pub const MAX_SOURCES: usize = 8;

// Constants for delivery
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;
pub const HISTORY_LIMIT: usize = 50;
pub const RECENT_HISTORY_SHOWN: usize = 10;

pub const DEFAULT_LOCALES_DIR: &str = "./locales";
pub const DEFAULT_WEBHOOK_PORT: u16 = 8080;

/// Configuration for the request interpreter
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Topic used when nothing usable is left after stripping keywords
    pub fallback_topic: String,
    /// Topics shorter than this (in characters) trigger the fallback
    pub min_topic_length: usize,
    /// Topics are truncated to this many characters
    pub max_topic_length: usize,
    /// Longest bare number (no unit word) still accepted as a volume
    pub bare_number_max_digits: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            fallback_topic: DEFAULT_TOPIC.to_string(),
            min_topic_length: MIN_TOPIC_LENGTH,
            max_topic_length: MAX_TOPIC_LENGTH,
            bare_number_max_digits: BARE_NUMBER_MAX_DIGITS,
        }
    }
}

/// Configuration for document assembly
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Target word count for one page of a text document
    pub words_per_page: usize,
    /// Upper bound on numbered main sections for notes and research papers
    pub max_main_sections: u32,
    /// Upper bound on argument sections for essays
    pub max_essay_arguments: u32,
    /// Upper bound on the number of listed sources
    pub max_sources: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            words_per_page: WORDS_PER_PAGE,
            max_main_sections: MAX_MAIN_SECTIONS,
            max_essay_arguments: MAX_ESSAY_ARGUMENTS,
            max_sources: MAX_SOURCES,
        }
    }
}

/// Configuration for sending results back to the user
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Maximum characters per outgoing chat message
    pub max_message_chars: usize,
    /// Maximum number of history entries kept per user
    pub history_limit: usize,
    /// Number of entries listed by the history command
    pub recent_history_shown: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_message_chars: TELEGRAM_MESSAGE_LIMIT,
            history_limit: HISTORY_LIMIT,
            recent_history_shown: RECENT_HISTORY_SHOWN,
        }
    }
}

/// Webhook listener settings
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Public URL Telegram posts updates to
    pub url: Url,
    /// Local address the listener binds to
    pub address: SocketAddr,
}

/// Runtime settings for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    /// When set, updates arrive through a webhook instead of long polling
    pub webhook: Option<WebhookConfig>,
    pub locales_dir: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    pub delivery: DeliveryConfig,
    pub content: ContentConfig,
}

impl BotConfig {
    /// Load settings from environment variables
    ///
    /// `TELEGRAM_BOT_TOKEN` is required. `WEBHOOK_URL` switches the bot to
    /// webhook mode, listening on `PORT` (default 8080).
    pub fn from_env() -> Result<Self> {
        let telegram_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let webhook = match env::var("WEBHOOK_URL") {
            Ok(raw_url) if !raw_url.trim().is_empty() => {
                let url = Url::parse(raw_url.trim())
                    .with_context(|| format!("WEBHOOK_URL is not a valid URL: {raw_url}"))?;
                let port = match env::var("PORT") {
                    Ok(port) => port
                        .parse::<u16>()
                        .with_context(|| format!("PORT is not a valid port number: {port}"))?,
                    Err(_) => DEFAULT_WEBHOOK_PORT,
                };
                Some(WebhookConfig {
                    url,
                    address: SocketAddr::from(([0, 0, 0, 0], port)),
                })
            }
            _ => None,
        };

        let locales_dir =
            env::var("LOCALES_DIR").unwrap_or_else(|_| DEFAULT_LOCALES_DIR.to_string());
        let json_logs = env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            telegram_token,
            webhook,
            locales_dir,
            json_logs,
            delivery: DeliveryConfig::default(),
            content: ContentConfig::default(),
        })
    }
}
