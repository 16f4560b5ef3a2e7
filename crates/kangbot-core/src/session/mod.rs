//! Login and conversation session lifecycle.

pub mod service;
