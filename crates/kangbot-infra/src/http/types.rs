//! Backend wire types.
//!
//! These mirror the JSON the backend speaks. They are NOT the domain types
//! from kangbot-types; conversion happens in the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kangbot_types::de::string_or_number;
use kangbot_types::session::HistoryEntry;

/// Response body of `POST /auth/generate-token`.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
}

/// Request body of `POST /chat/message`.
#[derive(Debug, Serialize)]
pub struct MessageRequest<'a> {
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub message: &'a str,
}

/// Response body of `POST /chat/message`. A missing or null `text` is an
/// empty reply.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response body of `GET /sessions/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

/// Error body of any non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_request_shape() {
        let body = MessageRequest {
            user_id: "42",
            session_id: "abc",
            message: "hello",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"user_id": "42", "session_id": "abc", "message": "hello"})
        );
    }

    #[test]
    fn test_message_response_missing_text() {
        let resp: MessageResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text.is_none());
        let resp: MessageResponse = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert!(resp.text.is_none());
    }

    #[test]
    fn test_token_response_numeric_user_id() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","user_id":42,"token_type":"bearer"}"#)
                .unwrap();
        assert_eq!(resp.user_id, "42");
    }

    #[test]
    fn test_history_response() {
        let json = r#"{
            "session_id": "s",
            "messages": [
                {"role": "user", "content": "hi", "created_at": "2025-03-01T09:00:00+00:00"},
                {"role": "assistant", "content": "hello", "created_at": "2025-03-01T09:00:02+00:00"}
            ]
        }"#;
        let resp: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[1].role, "assistant");
    }
}
