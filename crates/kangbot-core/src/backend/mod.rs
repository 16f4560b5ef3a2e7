//! ChatBackend trait definition.
//!
//! This is the port the infrastructure layer implements over HTTP. Services
//! in this crate depend only on the trait, which keeps them testable with
//! an in-memory backend.

#[cfg(test)]
pub(crate) mod scripted;

use std::future::Future;

use secrecy::SecretString;

use kangbot_types::auth::{TokenGrant, UserProfile};
use kangbot_types::error::BackendError;
use kangbot_types::session::{HistoryEntry, Session};

/// Remote chat backend.
///
/// Uses native async fn in traits (RPITIT). `bearer` is attached as an
/// `Authorization: Bearer` header when present and omitted otherwise.
pub trait ChatBackend: Send + Sync {
    /// Issue a token for `user_id`.
    fn generate_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<TokenGrant, BackendError>> + Send;

    /// Open a new conversation session.
    fn create_session(
        &self,
        bearer: Option<&SecretString>,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// Send one user message and return the complete reply text.
    ///
    /// A reply without text comes back as an empty string; deciding what to
    /// do about that is the caller's business.
    fn send_message(
        &self,
        bearer: Option<&SecretString>,
        session: &Session,
        message: &str,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Describe the user the bearer token belongs to.
    fn current_user(
        &self,
        bearer: &SecretString,
    ) -> impl Future<Output = Result<UserProfile, BackendError>> + Send;

    /// Stored messages of one session, oldest first.
    fn session_messages(
        &self,
        bearer: Option<&SecretString>,
        session_id: &str,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, BackendError>> + Send;

    /// Tell the backend the user is leaving.
    fn logout(
        &self,
        bearer: Option<&SecretString>,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}
