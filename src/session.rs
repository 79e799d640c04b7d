//! Per-user session state: the request waiting for a delivery format choice
//! and a bounded history of delivered requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::delivery::DeliveryFormat;
use crate::request_types::ParsedRequest;

/// A request that was delivered to the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub request: ParsedRequest,
    pub format: DeliveryFormat,
    pub delivered_at: DateTime<Utc>,
}

/// Everything the bot remembers about one user
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Telegram language code seen on the user's last message
    pub language_code: Option<String>,
    /// Most recently delivered request
    pub last_request: Option<ParsedRequest>,
    /// Parsed request waiting for the user to pick a delivery format
    pub pending: Option<ParsedRequest>,
    /// Delivered requests, oldest first
    pub history: VecDeque<HistoryEntry>,
}

impl SessionState {
    /// Park a request until the user chooses a format; replaces any older one
    pub fn set_pending(&mut self, request: ParsedRequest) {
        self.pending = Some(request);
    }

    pub fn take_pending(&mut self) -> Option<ParsedRequest> {
        self.pending.take()
    }

    /// Returns whether something was pending
    pub fn clear_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Remember a delivered request, evicting the oldest entries beyond `limit`
    pub fn record_delivery(&mut self, request: ParsedRequest, format: DeliveryFormat, limit: usize) {
        self.last_request = Some(request.clone());
        self.history.push_back(HistoryEntry {
            request,
            format,
            delivered_at: Utc::now(),
        });
        while self.history.len() > limit {
            self.history.pop_front();
        }
    }

    /// Up to `count` history entries, newest first
    pub fn recent_history(&self, count: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(count)
    }
}

/// Storage for session state keyed by Telegram user id
///
/// Handlers receive the store as `Arc<dyn SessionStore>`, so the backing
/// implementation can change without touching them.
pub trait SessionStore: Send + Sync {
    /// State for the user, or a fresh default state
    fn get(&self, user_id: u64) -> SessionState;
    fn put(&self, user_id: u64, state: SessionState);
}

/// Process-local session store; everything is lost on restart
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<u64, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, SessionState>> {
        // Entries are only ever replaced whole, so a poisoned map is consistent
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: u64) -> SessionState {
        self.lock().get(&user_id).cloned().unwrap_or_default()
    }

    fn put(&self, user_id: u64, state: SessionState) {
        self.lock().insert(user_id, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_types::DocumentType;

    fn request(topic: &str) -> ParsedRequest {
        ParsedRequest {
            topic: topic.to_string(),
            document_type: DocumentType::Note,
            volume: 3,
        }
    }

    #[test]
    fn test_pending_lifecycle() {
        let mut state = SessionState::default();
        assert!(state.take_pending().is_none());

        state.set_pending(request("экология"));
        state.set_pending(request("история"));
        assert_eq!(state.take_pending().unwrap().topic, "история");
        assert!(state.take_pending().is_none());
        assert!(!state.clear_pending());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = SessionState::default();
        for i in 0..5 {
            state.record_delivery(request(&format!("тема {i}")), DeliveryFormat::Inline, 3);
        }
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.history.front().unwrap().request.topic, "тема 2");
        assert_eq!(state.last_request.as_ref().unwrap().topic, "тема 4");
    }

    #[test]
    fn test_store_returns_default_for_unknown_user() {
        let store = InMemorySessionStore::new();
        let state = store.get(42);
        assert!(state.pending.is_none());
        assert!(state.history.is_empty());
        assert_eq!(store.user_count(), 0);
    }
}
