//! Credential handling.
//!
//! The bearer token lives in a [`token_store::TokenStore`] owned by the
//! caller and handed to each service call, never in process-wide state.

pub mod token_store;
