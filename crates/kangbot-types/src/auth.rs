//! Credential and user identity types.
//!
//! The access token is held as a [`SecretString`] so it never shows up in
//! `Debug` output or tracing fields.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::string_or_number;

/// Result of a successful token generation.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: SecretString,
    pub user_id: String,
}

impl TokenGrant {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            user_id: user_id.into(),
        }
    }
}

/// The currently authenticated user as reported by the backend.
///
/// Only `id` is guaranteed; everything else the backend sends is kept in
/// `extra` so the CLI can print it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Best display label: name, then email, then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}
