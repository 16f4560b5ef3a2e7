//! Chat service: drives one conversation from login to reply playback.
//!
//! Owns the token store, the current session and the conversation, and
//! wires the session service, message delivery and playback engine
//! together. `send` takes `&mut self`, so only one message can be in flight
//! per conversation.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{error, info, warn};

use kangbot_types::auth::UserProfile;
use kangbot_types::config::{ClientConfig, PlaybackConfig};
use kangbot_types::error::{ChatError, DeliveryError};
use kangbot_types::message::Message;
use kangbot_types::session::{HistoryEntry, Session};

use crate::auth::token_store::TokenStore;
use crate::backend::ChatBackend;
use crate::chat::conversation::Conversation;
use crate::delivery::{DeliveryEvent, MessageDelivery};
use crate::playback::PlaybackEngine;
use crate::session::service::SessionService;

/// Posted instead of a session when nobody is logged in.
pub const LOGIN_REQUIRED_TEXT: &str = "Login is required.";

/// Posted when the backend refuses to open a session.
pub const SESSION_FAILED_TEXT: &str =
    "Sorry, the chat session could not be started. Please try again shortly.";

/// Final text of a bot reply whose delivery failed.
pub fn delivery_apology(err: &DeliveryError) -> String {
    format!("Sorry, an error occurred: {}", err.user_message())
}

pub struct ChatService<B: ChatBackend> {
    sessions: SessionService<B>,
    delivery: MessageDelivery<B>,
    playback: PlaybackConfig,
    tokens: TokenStore,
    session: Option<Session>,
    conversation: Conversation,
}

impl<B: ChatBackend + 'static> ChatService<B> {
    pub fn new(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            sessions: SessionService::new(Arc::clone(&backend)),
            delivery: MessageDelivery::new(backend, config.delivery.clone()),
            playback: config.playback.clone(),
            tokens: TokenStore::new(),
            session: None,
            conversation: Conversation::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_set()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Generate a token for `identifier`, then start a fresh chat.
    pub async fn login(&mut self, identifier: &str) -> Result<&Session, ChatError> {
        let grant = self.sessions.generate_token(&mut self.tokens, identifier).await?;
        info!(user.id = %grant.user_id, "Logged in");
        self.new_chat().await
    }

    /// Drop the token, the session and the conversation.
    pub async fn logout(&mut self) {
        self.sessions.logout(&mut self.tokens).await;
        self.session = None;
        self.conversation.clear();
    }

    /// Start a new session, replacing the current one and clearing the
    /// conversation.
    ///
    /// Failures leave a bot notice in the conversation explaining what went
    /// wrong, in addition to returning the error.
    pub async fn new_chat(&mut self) -> Result<&Session, ChatError> {
        if !self.tokens.is_set() {
            self.conversation.clear();
            self.conversation.push_notice(LOGIN_REQUIRED_TEXT);
            return Err(ChatError::NotLoggedIn);
        }

        match self.sessions.create_session(&self.tokens).await {
            Ok(session) => {
                self.conversation.clear();
                Ok(&*self.session.insert(session))
            }
            Err(e) => {
                self.conversation.clear();
                self.conversation.push_notice(SESSION_FAILED_TEXT);
                Err(e.into())
            }
        }
    }

    /// Send `text` in the current session and play the reply back.
    ///
    /// `on_frame` sees the bot message each time it changes: once in
    /// `Typing`, then after every drained character, and finally in
    /// `Complete`. On a delivery failure the message is completed with an
    /// apology and the error is returned.
    pub async fn send<F>(&mut self, text: &str, mut on_frame: F) -> Result<Message, ChatError>
    where
        F: FnMut(&Message),
    {
        let session = self.session.clone().ok_or(ChatError::NoSession)?;

        self.conversation.push_user(text);
        let bot_id = self.conversation.begin_reply()?;
        if let Some(typing) = self.conversation.get(bot_id) {
            on_frame(typing);
        }

        let mut stream = self.delivery.send_message(&self.tokens, &session, text);
        let engine = PlaybackEngine::start(&self.playback);
        let mut frames = engine.subscribe();

        let mut failure = None;
        while let Some(event) = stream.next().await {
            match event {
                Ok(DeliveryEvent::Chunk(c)) => engine.enqueue(c),
                Ok(DeliveryEvent::Done) => break,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(err) = failure {
            engine.abort();
            error!(error = %err, session.id = %session.session_id, "Reply abandoned");
            let message = self.conversation.complete(bot_id, delivery_apology(&err))?;
            on_frame(message);
            return Err(err.into());
        }

        // Forward frames until the drain loop reports the last character.
        let finish = engine.finish();
        tokio::pin!(finish);
        let mut frames_open = true;
        let final_text = loop {
            tokio::select! {
                biased;
                text = &mut finish => break text,
                changed = frames.changed(), if frames_open => {
                    if changed.is_err() {
                        frames_open = false;
                        continue;
                    }
                    let text = frames.borrow_and_update().clone();
                    let message = self.conversation.stream(bot_id, &text)?;
                    on_frame(message);
                }
            }
        };

        let message = self.conversation.complete(bot_id, final_text)?;
        on_frame(message);
        Ok(message.clone())
    }

    /// Describe the logged-in user.
    pub async fn whoami(&self) -> Result<UserProfile, ChatError> {
        Ok(self.sessions.current_user(&self.tokens).await?)
    }

    /// Stored history of the current session.
    pub async fn history(&self, limit: Option<u32>) -> Result<Vec<HistoryEntry>, ChatError> {
        let session = self.session.as_ref().ok_or(ChatError::NoSession)?;
        match self.sessions.session_history(&self.tokens, session, limit).await {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, "History unavailable");
                Err(e.into())
            }
        }
    }
}
