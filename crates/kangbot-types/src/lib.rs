//! Shared domain types for kangbot.
//!
//! Credentials, sessions, conversation messages, client configuration, and
//! the error taxonomy used by every other crate.
//!
//! No I/O dependencies: only serde, chrono, secrecy, thiserror.

pub mod auth;
pub mod config;
pub mod de;
pub mod error;
pub mod message;
pub mod session;
