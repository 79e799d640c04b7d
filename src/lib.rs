//! # Konspekt Telegram Bot
//!
//! A Telegram bot that turns free-text requests such as
//! "реферат про экологию 4 листа" into a topic, a document type and a volume,
//! assembles a study document from templates and sends it back inline or as
//! a text file.

pub mod bot;
pub mod config;
pub mod content;
pub mod delivery;
pub mod delivery_errors;
pub mod interpreter;
pub mod localization;
pub mod request_patterns;
pub mod request_types;
pub mod session;
