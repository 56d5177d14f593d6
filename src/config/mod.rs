// src/config/mod.rs

use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub host: String,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub refresh_on_start: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set (see .env)")]
    Missing(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let api_base_url = required("API_BASE_URL")?.trim_end_matches('/').to_string();
        let api_key = required("API_KEY")?;

        Ok(Self {
            api_base_url,
            api_key,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT").and_then(|s| s.parse().ok()).unwrap_or(8080),
            upstream_timeout: Duration::from_secs(
                lookup("UPSTREAM_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            refresh_on_start: lookup("REFRESH_ON_START")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        })
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("refresh_on_start", &self.refresh_on_start)
            .finish()
    }
}
