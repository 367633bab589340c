// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";
/// Flash messages clear after this many milliseconds.
pub const DEFAULT_FLASH_MS: u64 = 3000;
/// Per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the classification API (no trailing slash)
    pub api_url: String,
    /// Durable key-value file holding the persisted session
    pub session_file: PathBuf,
    /// How long a flashed error stays visible
    pub flash_window: Duration,
    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: default_session_file(),
            flash_window: Duration::from_millis(DEFAULT_FLASH_MS),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("CLASSIFY_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if api_url.is_empty() {
            return Err(ConfigError::Invalid("CLASSIFY_API_URL", "empty".to_string()));
        }

        Ok(Self {
            api_url,
            session_file: env::var("CLASSIFY_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_file()),
            flash_window: Duration::from_millis(parse_u64("CLASSIFY_FLASH_MS", DEFAULT_FLASH_MS)?),
            request_timeout: Duration::from_secs(parse_u64(
                "CLASSIFY_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }

    /// Point the client at a different backend.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different session file.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("classify-admin")
        .join("session.json")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("CLASSIFY_API_URL", "http://api.test:8080/");
        env::set_var("CLASSIFY_FLASH_MS", "1500");
        env::remove_var("CLASSIFY_HTTP_TIMEOUT_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "http://api.test:8080");
        assert_eq!(config.flash_window, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        env::set_var("CLASSIFY_FLASH_MS", "soon");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("CLASSIFY_FLASH_MS", _))
        ));

        env::remove_var("CLASSIFY_API_URL");
        env::remove_var("CLASSIFY_FLASH_MS");
    }

    #[test]
    fn test_builder_overrides_strip_trailing_slash() {
        let config = Config::default()
            .with_api_url("http://127.0.0.1:4000/")
            .with_session_file("/tmp/session.json");

        assert_eq!(config.api_url, "http://127.0.0.1:4000");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }
}
