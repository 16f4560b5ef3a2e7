//! HttpChatBackend -- concrete [`ChatBackend`] implementation over the
//! backend's REST API.
//!
//! Every call is a single request/response exchange. The bearer token is
//! attached as `Authorization: Bearer <token>` when one is held and the
//! header is omitted entirely otherwise.

pub mod types;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use kangbot_core::backend::ChatBackend;
use kangbot_types::auth::{TokenGrant, UserProfile};
use kangbot_types::config::ClientConfig;
use kangbot_types::error::BackendError;
use kangbot_types::session::{HistoryEntry, Session};

use self::types::{ErrorBody, HistoryResponse, MessageRequest, MessageResponse, TokenResponse};

/// REST client for the chat backend.
///
/// Holds no credentials of its own; callers pass the bearer per call.
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Build a client for `config.base_url`. A request timeout is applied
    /// only when the config sets one.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&SecretString>) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match bearer {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }
}

/// Send `req` and decode a 2xx body as `T`.
///
/// `action` names the operation for the generic error message used when a
/// failed response carries no `detail`.
async fn execute<T: DeserializeOwned>(req: RequestBuilder, action: &str) -> Result<T, BackendError> {
    let response = req
        .send()
        .await
        .map_err(|e| BackendError::Transport(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body, action, status.as_u16());
        tracing::debug!(http.status = status.as_u16(), %detail, "Backend returned an error status");
        return Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(format!("failed to parse response: {e}")))
}

/// Pull a human-readable message out of an error body.
///
/// A string `detail` is used as is. Any other `detail` (validation error
/// lists, objects) is rendered as compact JSON. Without one, falls back to
/// `"Failed to <action>: <status>"`.
fn error_detail(body: &str, action: &str, status: u16) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_null());

    match detail {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => format!("Failed to {action}: {status}"),
    }
}

impl ChatBackend for HttpChatBackend {
    async fn generate_token(&self, user_id: &str) -> Result<TokenGrant, BackendError> {
        let req = self
            .request(Method::POST, "/auth/generate-token", None)
            .query(&[("user_id", user_id)]);
        let resp: TokenResponse = execute(req, "generate token").await?;
        Ok(TokenGrant::new(resp.access_token, resp.user_id))
    }

    async fn create_session(&self, bearer: Option<&SecretString>) -> Result<Session, BackendError> {
        let req = self.request(Method::POST, "/sessions/", bearer);
        execute(req, "create session").await
    }

    async fn send_message(
        &self,
        bearer: Option<&SecretString>,
        session: &Session,
        message: &str,
    ) -> Result<String, BackendError> {
        let body = MessageRequest {
            user_id: &session.user_id,
            session_id: &session.session_id,
            message,
        };
        let req = self.request(Method::POST, "/chat/message", bearer).json(&body);
        let resp: MessageResponse = execute(req, "send message").await?;
        Ok(resp.text.unwrap_or_default())
    }

    async fn current_user(&self, bearer: &SecretString) -> Result<UserProfile, BackendError> {
        let req = self.request(Method::GET, "/auth/me", Some(bearer));
        execute(req, "load user").await
    }

    async fn session_messages(
        &self,
        bearer: Option<&SecretString>,
        session_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let mut req = self.request(Method::GET, &format!("/sessions/{session_id}/messages"), bearer);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        let resp: HistoryResponse = execute(req, "load messages").await?;
        Ok(resp.messages)
    }

    async fn logout(&self, bearer: Option<&SecretString>) -> Result<(), BackendError> {
        let req = self.request(Method::POST, "/auth/logout", bearer);
        let _: serde_json::Value = execute(req, "log out").await?;
        Ok(())
    }
}
