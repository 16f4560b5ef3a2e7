//! Conversation state and the service that drives a chat turn.

pub mod conversation;
pub mod service;

pub use conversation::Conversation;
pub use service::ChatService;
