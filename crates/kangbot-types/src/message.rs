//! Conversation message types.
//!
//! A conversation is an append-only list of [`Message`]s rendered top to
//! bottom. Only the bot reply currently being answered may be in a state
//! other than `Complete`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    /// Accepts the backend's role names as well (`assistant`, `model`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" | "assistant" | "model" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Rendering state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Bot reply created, no characters received yet.
    Typing,
    /// Characters are being played back.
    Streaming,
    Complete,
}

impl MessageStatus {
    /// Whether this message is still being answered.
    pub fn is_active(self) -> bool {
        !matches!(self, MessageStatus::Complete)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Typing => write!(f, "typing"),
            MessageStatus::Streaming => write!(f, "streaming"),
            MessageStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic id derived from the creation timestamp (milliseconds).
    pub id: i64,
    pub sender: Sender,
    pub text: String,
    pub status: MessageStatus,
}

impl Message {
    pub fn user(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
            status: MessageStatus::Complete,
        }
    }

    /// A finished bot message, used for notices and apologies.
    pub fn bot(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::Bot,
            text: text.into(),
            status: MessageStatus::Complete,
        }
    }

    /// An empty bot reply waiting for its first character.
    pub fn typing(id: i64) -> Self {
        Self {
            id,
            sender: Sender::Bot,
            text: String::new(),
            status: MessageStatus::Typing,
        }
    }
}
