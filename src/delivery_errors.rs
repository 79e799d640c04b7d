//! # Delivery Error Types Module
//!
//! This module defines the error types for sending assembled documents back
//! to the user, either as chat messages or as exported files.

/// Custom error types for delivery operations
#[derive(Debug, Clone)]
pub enum DeliveryError {
    /// Temporary file creation or write errors
    Io(String),
    /// Telegram API rejected the outgoing message or file
    Send(String),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Io(msg) => write!(f, "I/O error: {msg}"),
            DeliveryError::Send(msg) => write!(f, "Send error: {msg}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

impl From<std::io::Error> for DeliveryError {
    fn from(err: std::io::Error) -> Self {
        DeliveryError::Io(err.to_string())
    }
}

impl From<teloxide::RequestError> for DeliveryError {
    fn from(err: teloxide::RequestError) -> Self {
        DeliveryError::Send(err.to_string())
    }
}
