use thiserror::Error;

/// Raw failure from a backend call, before a service gives it meaning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-success HTTP status. `detail` is the server-supplied message or a
    /// generic one when the body carried none.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl BackendError {
    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message without the status prefix.
    pub fn detail(&self) -> &str {
        match self {
            BackendError::Status { detail, .. } => detail,
            BackendError::Transport(msg) | BackendError::Decode(msg) => msg,
        }
    }
}

/// Errors related to authentication and the current user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user identifier must not be empty")]
    EmptyIdentifier,

    #[error("not logged in")]
    NotAuthenticated,

    #[error("token generation failed: {0}")]
    TokenGeneration(BackendError),

    #[error("failed to load user profile: {0}")]
    Profile(BackendError),
}

/// Errors related to the conversation session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session creation failed: {0}")]
    Creation(BackendError),

    #[error("failed to load session history: {0}")]
    History(BackendError),
}

impl SessionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Creation(e) | SessionError::History(e) => e.status(),
        }
    }
}

/// Errors from sending a message. Empty replies are not errors; they are
/// retried and eventually replaced by fallback text.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("message delivery failed: {0}")]
    Backend(#[from] BackendError),
}

impl DeliveryError {
    /// The message shown to the user inside the apology text.
    pub fn user_message(&self) -> &str {
        match self {
            DeliveryError::Backend(e) => e.detail(),
        }
    }
}

/// Errors from conversation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("a bot reply is already in progress (message {0})")]
    ReplyInProgress(i64),

    #[error("message {0} not found")]
    UnknownMessage(i64),

    #[error("message {0} is not being answered")]
    NotActive(i64),
}

/// Errors surfaced by the chat turn driver.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("login is required")]
    NotLoggedIn,

    #[error("no active chat session")]
    NoSession,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_display() {
        let err = BackendError::Status {
            status: 500,
            detail: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), "boom");
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = BackendError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn test_session_error_carries_status() {
        let err = SessionError::Creation(BackendError::Status {
            status: 401,
            detail: "Invalid or expired token".to_string(),
        });
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Invalid or expired token"));
    }

    #[test]
    fn test_delivery_user_message() {
        let err = DeliveryError::from(BackendError::Status {
            status: 400,
            detail: "Invalid session ID format".to_string(),
        });
        assert_eq!(err.user_message(), "Invalid session ID format");
        assert_eq!(
            err.to_string(),
            "message delivery failed: HTTP 400: Invalid session ID format"
        );
    }

    #[test]
    fn test_conversation_error_display() {
        let err = ConversationError::ReplyInProgress(7);
        assert_eq!(err.to_string(), "a bot reply is already in progress (message 7)");
    }

    #[test]
    fn test_chat_error_is_transparent() {
        let err = ChatError::from(AuthError::EmptyIdentifier);
        assert_eq!(err.to_string(), "user identifier must not be empty");
        assert_eq!(ChatError::NoSession.to_string(), "no active chat session");
    }
}
