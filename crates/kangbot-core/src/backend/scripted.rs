//! In-memory [`ChatBackend`] with scripted replies, for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};

use kangbot_types::auth::{TokenGrant, UserProfile};
use kangbot_types::error::BackendError;
use kangbot_types::session::{HistoryEntry, Session};

use super::ChatBackend;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub op: &'static str,
    pub bearer: Option<String>,
    pub message: Option<String>,
}

pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    session: Mutex<Result<Session, BackendError>>,
    token_error: Mutex<Option<BackendError>>,
    logout_error: Mutex<Option<BackendError>>,
    history: Mutex<Vec<HistoryEntry>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            session: Mutex::new(Ok(Session {
                user_id: "42".to_string(),
                session_id: "session-1".to_string(),
            })),
            token_error: Mutex::new(None),
            logout_error: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue message replies, consumed in order. Once exhausted every
    /// further send gets an empty reply.
    pub fn with_replies<I>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, BackendError>>,
    {
        self.replies.lock().unwrap().extend(replies);
        self
    }

    pub fn with_session(self, session: Result<Session, BackendError>) -> Self {
        *self.session.lock().unwrap() = session;
        self
    }

    pub fn with_token_error(self, err: BackendError) -> Self {
        *self.token_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_logout_error(self, err: BackendError) -> Self {
        *self.logout_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_history(self, history: Vec<HistoryEntry>) -> Self {
        *self.history.lock().unwrap() = history;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.op == op).count()
    }

    fn record(&self, op: &'static str, bearer: Option<&SecretString>, message: Option<&str>) {
        self.calls.lock().unwrap().push(Call {
            op,
            bearer: bearer.map(|b| b.expose_secret().to_string()),
            message: message.map(str::to_string),
        });
    }
}

impl ChatBackend for ScriptedBackend {
    async fn generate_token(&self, user_id: &str) -> Result<TokenGrant, BackendError> {
        self.record("generate_token", None, Some(user_id));
        if let Some(err) = self.token_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(TokenGrant::new(format!("token-for-{user_id}"), user_id))
    }

    async fn create_session(&self, bearer: Option<&SecretString>) -> Result<Session, BackendError> {
        self.record("create_session", bearer, None);
        self.session.lock().unwrap().clone()
    }

    async fn send_message(
        &self,
        bearer: Option<&SecretString>,
        _session: &Session,
        message: &str,
    ) -> Result<String, BackendError> {
        self.record("send_message", bearer, Some(message));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn current_user(&self, bearer: &SecretString) -> Result<UserProfile, BackendError> {
        self.record("current_user", Some(bearer), None);
        Ok(UserProfile {
            id: "42".to_string(),
            email: None,
            name: Some("Tester".to_string()),
            extra: Default::default(),
        })
    }

    async fn session_messages(
        &self,
        bearer: Option<&SecretString>,
        session_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        self.record("session_messages", bearer, Some(session_id));
        let history = self.history.lock().unwrap().clone();
        Ok(match limit {
            Some(n) => history.into_iter().take(n as usize).collect(),
            None => history,
        })
    }

    async fn logout(&self, bearer: Option<&SecretString>) -> Result<(), BackendError> {
        self.record("logout", bearer, None);
        match self.logout_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
