//! Client configuration types for kangbot.
//!
//! `ClientConfig` represents `config.toml`: backend location, the empty-reply
//! retry policy, and playback pacing. All fields have defaults.

use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Default backend when neither the config file nor the environment says otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            delivery: DeliveryConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Retry policy for empty replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Retries after the initial attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Text played back when every attempt came back empty.
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_fallback_text() -> String {
    "Sorry, I could not generate a response. Please try again.".to_string()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            fallback_text: default_fallback_text(),
        }
    }
}

impl DeliveryConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Typewriter pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between characters while more are queued.
    #[serde(default = "default_char_interval_ms")]
    pub char_interval_ms: u64,
}

fn default_char_interval_ms() -> u64 {
    10
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: default_char_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn char_interval(&self) -> Duration {
        Duration::from_millis(self.char_interval_ms)
    }
}
