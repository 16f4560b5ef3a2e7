//! Application state wiring the chat service to the HTTP backend.
//!
//! `ChatService` is generic over the backend port; AppState pins it to the
//! concrete infra implementation.

use std::sync::Arc;

use kangbot_core::chat::service::ChatService;
use kangbot_infra::config::resolve_client_config;
use kangbot_infra::http::HttpChatBackend;
use kangbot_types::config::ClientConfig;

pub type ConcreteChatService = ChatService<HttpChatBackend>;

/// State for one `kbot` invocation.
pub struct AppState {
    pub config: ClientConfig,
    pub chat: ConcreteChatService,
}

impl AppState {
    /// Resolve configuration and wire the chat service.
    pub async fn init(api_url: Option<&str>) -> anyhow::Result<Self> {
        let config = resolve_client_config(api_url).await?;
        let backend = HttpChatBackend::new(&config)?;
        let chat = ChatService::new(Arc::new(backend), &config);

        tracing::debug!(base_url = %config.base_url, "Application state initialized");
        Ok(Self { config, chat })
    }
}
