//! Session service: token generation, session creation, and the small
//! account operations around them.
//!
//! Every operation takes the [`TokenStore`] explicitly. Only
//! `generate_token` and `logout` mutate it.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, debug, info, info_span, warn};

use kangbot_types::auth::{TokenGrant, UserProfile};
use kangbot_types::error::{AuthError, SessionError};
use kangbot_types::session::{HistoryEntry, Session};

use crate::auth::token_store::TokenStore;
use crate::backend::ChatBackend;

/// Service for authentication and session lifecycle.
pub struct SessionService<B: ChatBackend> {
    backend: Arc<B>,
}

impl<B: ChatBackend> SessionService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Generate a token for `identifier` and store it in `tokens`.
    ///
    /// The identifier is trimmed first; an empty one fails without a request.
    pub async fn generate_token(
        &self,
        tokens: &mut TokenStore,
        identifier: &str,
    ) -> Result<TokenGrant, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::EmptyIdentifier);
        }

        let span = info_span!("auth.generate_token", user.id = %identifier);
        let grant = self
            .backend
            .generate_token(identifier)
            .instrument(span)
            .await
            .map_err(|e| {
                warn!(error = %e, "Token generation failed");
                AuthError::TokenGeneration(e)
            })?;

        tokens.set(SecretString::from(grant.access_token.expose_secret().to_owned()));
        info!(user.id = %grant.user_id, "Access token stored");
        Ok(grant)
    }

    /// Open a new conversation session, authenticated if a token is held.
    pub async fn create_session(&self, tokens: &TokenStore) -> Result<Session, SessionError> {
        let span = info_span!("session.create", auth = tokens.is_set());
        let session = self
            .backend
            .create_session(tokens.get())
            .instrument(span)
            .await
            .map_err(|e| {
                warn!(error = %e, status = ?e.status(), "Session creation failed");
                SessionError::Creation(e)
            })?;

        info!(session.id = %session.session_id, user.id = %session.user_id, "Chat session created");
        Ok(session)
    }

    /// Describe the logged-in user.
    pub async fn current_user(&self, tokens: &TokenStore) -> Result<UserProfile, AuthError> {
        let bearer = tokens.get().ok_or(AuthError::NotAuthenticated)?;
        self.backend
            .current_user(bearer)
            .await
            .map_err(AuthError::Profile)
    }

    /// Stored messages of `session`, oldest first, optionally truncated.
    pub async fn session_history(
        &self,
        tokens: &TokenStore,
        session: &Session,
        limit: Option<u32>,
    ) -> Result<Vec<HistoryEntry>, SessionError> {
        let entries = self
            .backend
            .session_messages(tokens.get(), &session.session_id, limit)
            .await
            .map_err(SessionError::History)?;
        debug!(session.id = %session.session_id, count = entries.len(), "Loaded session history");
        Ok(entries)
    }

    /// Log out: notify the backend (best effort) and always drop the token.
    pub async fn logout(&self, tokens: &mut TokenStore) {
        if tokens.is_set() {
            if let Err(e) = self.backend.logout(tokens.get()).await {
                warn!(error = %e, "Backend logout failed; clearing local token anyway");
            }
        }
        tokens.clear();
        info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scripted::ScriptedBackend;
    use chrono::Utc;
    use kangbot_types::error::BackendError;

    fn service(backend: ScriptedBackend) -> (SessionService<ScriptedBackend>, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        (SessionService::new(Arc::clone(&backend)), backend)
    }

    #[tokio::test]
    async fn test_generate_token_stores_credential() {
        let (svc, _backend) = service(ScriptedBackend::new());
        let mut tokens = TokenStore::new();

        let grant = svc.generate_token(&mut tokens, " 42 ").await.unwrap();
        assert_eq!(grant.user_id, "42");
        assert_eq!(tokens.get().unwrap().expose_secret(), "token-for-42");
    }

    #[tokio::test]
    async fn test_generate_token_rejects_empty_identifier() {
        let (svc, backend) = service(ScriptedBackend::new());
        let mut tokens = TokenStore::new();

        let err = svc.generate_token(&mut tokens, "   ").await.unwrap_err();
        assert!(matches!(err, AuthError::EmptyIdentifier));
        assert_eq!(backend.count("generate_token"), 0);
    }

    #[tokio::test]
    async fn test_generate_token_failure_keeps_old_token() {
        let (svc, _backend) = service(ScriptedBackend::new().with_token_error(BackendError::Status {
            status: 500,
            detail: "down".to_string(),
        }));
        let mut tokens = TokenStore::new();
        tokens.set(SecretString::from("old"));

        let err = svc.generate_token(&mut tokens, "42").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenGeneration(BackendError::Status { status: 500, .. })));
        assert_eq!(tokens.get().unwrap().expose_secret(), "old");
    }

    #[tokio::test]
    async fn test_create_session_uses_token_from_login() {
        let (svc, backend) = service(ScriptedBackend::new());
        let mut tokens = TokenStore::new();

        svc.generate_token(&mut tokens, "42").await.unwrap();
        let session = svc.create_session(&tokens).await.unwrap();
        assert_eq!(session.session_id, "session-1");

        let call = backend.calls().into_iter().find(|c| c.op == "create_session").unwrap();
        assert_eq!(call.bearer.as_deref(), Some("token-for-42"));
    }

    #[tokio::test]
    async fn test_create_session_after_clear_omits_bearer() {
        let (svc, backend) = service(ScriptedBackend::new());
        let mut tokens = TokenStore::new();

        svc.generate_token(&mut tokens, "42").await.unwrap();
        tokens.clear();
        svc.create_session(&tokens).await.unwrap();

        let call = backend.calls().into_iter().find(|c| c.op == "create_session").unwrap();
        assert_eq!(call.bearer, None);
    }

    #[tokio::test]
    async fn test_create_session_failure_carries_status() {
        let (svc, _backend) = service(ScriptedBackend::new().with_session(Err(BackendError::Status {
            status: 503,
            detail: "Failed to create session: agent offline".to_string(),
        })));

        let err = svc.create_session(&TokenStore::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("agent offline"));
    }

    #[tokio::test]
    async fn test_current_user_requires_token() {
        let (svc, backend) = service(ScriptedBackend::new());
        let err = svc.current_user(&TokenStore::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
        assert_eq!(backend.count("current_user"), 0);
    }

    #[tokio::test]
    async fn test_session_history_limit() {
        let entry = |content: &str| HistoryEntry {
            role: "user".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        let (svc, _backend) = service(
            ScriptedBackend::new().with_history(vec![entry("a"), entry("b"), entry("c")]),
        );
        let session = Session {
            user_id: "42".to_string(),
            session_id: "session-1".to_string(),
        };

        let entries = svc
            .session_history(&TokenStore::new(), &session, Some(2))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].content, "b");
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let (svc, backend) = service(ScriptedBackend::new().with_logout_error(BackendError::Transport(
            "connection reset".to_string(),
        )));
        let mut tokens = TokenStore::new();
        tokens.set(SecretString::from("token"));

        svc.logout(&mut tokens).await;
        assert!(!tokens.is_set());
        assert_eq!(backend.count("logout"), 1);
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_backend() {
        let (svc, backend) = service(ScriptedBackend::new());
        svc.logout(&mut TokenStore::new()).await;
        assert_eq!(backend.count("logout"), 0);
    }
}
