//! Conversation session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::string_or_number;

/// A (user, session) pair identifying one conversation with the backend.
///
/// Immutable once created. Starting a new chat replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub session_id: String,
}

impl Session {
    /// First eight characters of the session id, for banners and logs.
    pub fn short_id(&self) -> &str {
        let end = self
            .session_id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.session_id.len());
        &self.session_id[..end]
    }
}

/// One stored message from the backend's history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserialize_numeric_user() {
        let json = r#"{"session_id":"a1b2c3d4-e5f6","user_id":42,"title":"new chat"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.user_id, "42");
        assert_eq!(session.session_id, "a1b2c3d4-e5f6");
    }

    #[test]
    fn test_short_id() {
        let session = Session {
            user_id: "1".to_string(),
            session_id: "0123456789abcdef".to_string(),
        };
        assert_eq!(session.short_id(), "01234567");

        let short = Session {
            user_id: "1".to_string(),
            session_id: "abc".to_string(),
        };
        assert_eq!(short.short_id(), "abc");
    }

    #[test]
    fn test_history_entry_deserialize() {
        let json = r#"{"role":"user","content":"hi","created_at":"2025-03-01T09:30:00Z"}"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.role, "user");
        assert_eq!(entry.created_at.format("%H:%M").to_string(), "09:30");
    }
}
