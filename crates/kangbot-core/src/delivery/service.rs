use std::pin::Pin;
use std::sync::Arc;

use futures_util::Stream;
use secrecy::SecretString;
use tracing::{Instrument, debug, error, info_span, warn};

use kangbot_types::config::DeliveryConfig;
use kangbot_types::error::DeliveryError;
use kangbot_types::session::Session;

use crate::auth::token_store::TokenStore;
use crate::backend::ChatBackend;

/// One item of a delivery stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEvent {
    /// The next character of the reply.
    Chunk(char),
    /// Every character has been emitted. Always the last item on success.
    Done,
}

/// Stream returned by [`MessageDelivery::send_message`].
pub type DeliveryStream =
    Pin<Box<dyn Stream<Item = Result<DeliveryEvent, DeliveryError>> + Send + 'static>>;

/// The text settled on for one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Requests issued, including the first.
    pub attempts: u32,
    /// True when every attempt came back empty and `text` is the fallback.
    pub fallback: bool,
}

impl Reply {
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Sends user messages and turns the reply into a chunk stream.
pub struct MessageDelivery<B: ChatBackend> {
    backend: Arc<B>,
    config: DeliveryConfig,
}

impl<B: ChatBackend + 'static> MessageDelivery<B> {
    pub fn new(backend: Arc<B>, config: DeliveryConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Send `text` and wait for a usable reply, retrying empty ones.
    pub async fn fetch_reply(
        &self,
        tokens: &TokenStore,
        session: &Session,
        text: &str,
    ) -> Result<Reply, DeliveryError> {
        fetch_with_retry(&*self.backend, &self.config, tokens.get(), session, text).await
    }

    /// Send `text` and stream the reply one character at a time.
    ///
    /// Yields `Chunk` per character followed by one `Done`, or a single
    /// `Err` with no chunks when the request fails. The bearer token is
    /// captured when this is called.
    pub fn send_message(&self, tokens: &TokenStore, session: &Session, text: &str) -> DeliveryStream {
        let backend = Arc::clone(&self.backend);
        let config = self.config.clone();
        let bearer = tokens.snapshot();
        let session = session.clone();
        let text = text.to_string();

        Box::pin(async_stream::try_stream! {
            let reply = fetch_with_retry(&*backend, &config, bearer.as_ref(), &session, &text).await?;
            for c in reply.text.chars() {
                yield DeliveryEvent::Chunk(c);
            }
            yield DeliveryEvent::Done;
        })
    }
}

/// Bounded retry loop: at most `max_retries` re-sends after the first
/// attempt, each preceded by `retry_delay`. Only empty replies are retried.
async fn fetch_with_retry<B: ChatBackend>(
    backend: &B,
    config: &DeliveryConfig,
    bearer: Option<&SecretString>,
    session: &Session,
    text: &str,
) -> Result<Reply, DeliveryError> {
    let mut retries: u32 = 0;

    loop {
        let attempt = retries + 1;
        let span = info_span!(
            "chat.send_message",
            session.id = %session.session_id,
            delivery.attempt = attempt,
        );

        let reply = match backend.send_message(bearer, session, text).instrument(span).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, status = ?e.status(), attempt, "Message delivery failed");
                return Err(DeliveryError::from(e));
            }
        };

        if !reply.trim().is_empty() {
            debug!(attempt, chars = reply.chars().count(), "Reply received");
            return Ok(Reply {
                text: reply,
                attempts: attempt,
                fallback: false,
            });
        }

        if retries >= config.max_retries {
            warn!(attempts = attempt, "Empty response retries exhausted; using fallback text");
            return Ok(Reply {
                text: config.fallback_text.clone(),
                attempts: attempt,
                fallback: true,
            });
        }

        retries += 1;
        debug!(retry = retries, max = config.max_retries, "Empty response, retrying");
        tokio::time::sleep(config.retry_delay()).await;
    }
}
