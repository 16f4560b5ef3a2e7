//! Client configuration loader for kangbot.
//!
//! Reads `config.toml` from the config directory (`~/.kangbot/` by default)
//! and layers the environment and command-line overrides on top.

use std::path::{Path, PathBuf};

use thiserror::Error;

use kangbot_types::config::ClientConfig;

/// Environment variable naming the config directory.
pub const HOME_ENV: &str = "KANGBOT_HOME";

/// Environment variable overriding `base_url`.
pub const API_URL_ENV: &str = "KANGBOT_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve the config directory.
///
/// Priority:
/// 1. `KANGBOT_HOME` environment variable
/// 2. `~/.kangbot`
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".kangbot");
    }

    PathBuf::from(".kangbot")
}

/// Load `{config_dir}/config.toml`.
///
/// A missing file yields [`ClientConfig::default()`]. A file that exists but
/// cannot be read or parsed is an error.
pub async fn load_config(config_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let config_path = config_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Ok(ClientConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })
}

/// Apply URL overrides in increasing priority: environment, then flag.
pub fn apply_overrides(config: &mut ClientConfig, env_url: Option<String>, flag_url: Option<&str>) {
    let url = flag_url
        .map(str::to_string)
        .or(env_url)
        .filter(|u| !u.trim().is_empty());
    if let Some(url) = url {
        config.base_url = url;
    }
}

/// Full resolution: defaults, config file, `KANGBOT_API_URL`, then `flag_url`.
pub async fn resolve_client_config(flag_url: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let dir = resolve_config_dir();
    let mut config = load_config(&dir).await?;
    apply_overrides(&mut config, std::env::var(API_URL_ENV).ok(), flag_url);
    tracing::debug!(base_url = %config.base_url, "Resolved client config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kangbot_types::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
base_url = "https://chat.example.edu"
request_timeout_secs = 30

[delivery]
max_retries = 2

[playback]
char_interval_ms = 0
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await.unwrap();
        assert_eq!(config.base_url, "https://chat.example.edu");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.delivery.max_retries, 2);
        assert_eq!(config.delivery.retry_delay_ms, 500);
        assert_eq!(config.playback.char_interval_ms, 0);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn apply_overrides_priority() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, None, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        apply_overrides(&mut config, Some("http://env:1".to_string()), None);
        assert_eq!(config.base_url, "http://env:1");

        apply_overrides(&mut config, Some("http://env:1".to_string()), Some("http://flag:2"));
        assert_eq!(config.base_url, "http://flag:2");
    }

    #[test]
    fn apply_overrides_ignores_blank_env() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, Some("  ".to_string()), None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_config_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var(HOME_ENV, "/tmp/test-kangbot");
        }
        let dir = resolve_config_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-kangbot"));
        unsafe {
            std::env::remove_var(HOME_ENV);
        }
    }
}
