//! In-memory holder for the bearer credential.
//!
//! Set on login, cleared on logout, lost when the process exits. Nothing is
//! written to disk.

use secrecy::{ExposeSecret, SecretString};

/// Holds at most one opaque bearer token.
///
/// Intentionally does NOT derive Debug; the token must never be printed.
#[derive(Default)]
pub struct TokenStore {
    token: Option<SecretString>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any held token.
    pub fn set(&mut self, token: SecretString) {
        self.token = Some(token);
    }

    pub fn get(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn is_set(&self) -> bool {
        self.token.is_some()
    }

    /// Owned copy of the token for work that outlives the borrow (streams).
    pub fn snapshot(&self) -> Option<SecretString> {
        self.token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }
}
