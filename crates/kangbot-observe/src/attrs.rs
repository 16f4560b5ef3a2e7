//! Span and event field names shared across kangbot.
//!
//! Usable as constant field names in `tracing` macros:
//! `info_span!("chat.turn", { attrs::SESSION_ID } = %id)`.

/// Backend session id of the conversation.
pub const SESSION_ID: &str = "session.id";

/// Identifier the user logged in with.
pub const USER_ID: &str = "user.id";

/// One-based request attempt within a delivery. Recorded by kangbot-core.
pub const DELIVERY_ATTEMPT: &str = "delivery.attempt";

/// HTTP status returned by the backend. Recorded by kangbot-infra.
pub const HTTP_STATUS: &str = "http.status";

// --- Span names ---

/// One user message and its reply, from send to final frame.
pub const SPAN_CHAT_TURN: &str = "chat.turn";

/// One `kbot` command invocation.
pub const SPAN_COMMAND: &str = "kbot.command";
