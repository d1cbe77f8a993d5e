//! Notification stream configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file (path in `WASHLINE_CONFIG`)
//! - environment variables (`WASHLINE_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use washline_stream::StreamConfig;
//!
//! // File from WASHLINE_CONFIG if set, otherwise env vars
//! let config = StreamConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = StreamConfig::from_file(std::path::Path::new("washline.toml")).expect("Failed to load");
//! ```

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use washline_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for washline_core::Error {
    fn from(e: ConfigError) -> Self {
        washline_core::Error::Config(e.to_string())
    }
}

/// Where and how often to fetch the live notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Backend base URL, e.g. `https://ops.example.com`.
    pub base_url: String,
    /// Path of the live notification endpoint.
    pub path: String,
    /// Seconds between fetches.
    pub poll_interval_secs: u64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_URL.to_string(),
            path: defaults::NOTIFICATIONS_PATH.to_string(),
            poll_interval_secs: defaults::STREAM_POLL_INTERVAL_SECS,
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            token_env: defaults::TOKEN_ENV.to_string(),
        }
    }
}

impl StreamConfig {
    /// Load from the file named by `WASHLINE_CONFIG`, or from env vars.
    pub fn load() -> ConfigResult<Self> {
        match env::var("WASHLINE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                info!(path = %path, "Loading stream config from file");
                Self::from_file(Path::new(path.trim()))
            }
            _ => {
                let config = Self::from_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StreamConfig = toml::from_str(&contents)?;
        config.validate()?;
        debug!(base_url = %config.base_url, "Parsed stream config file");
        Ok(config)
    }

    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `WASHLINE_API_URL` | `http://127.0.0.1:8080` | Backend base URL |
    /// | `WASHLINE_NOTIFICATIONS_PATH` | `/api/v1/notifications/live` | Feed path |
    /// | `WASHLINE_POLL_INTERVAL_SECS` | `15` | Seconds between fetches |
    /// | `WASHLINE_HTTP_TIMEOUT_SECS` | `10` | Request timeout |
    /// | `WASHLINE_TOKEN_ENV` | `WASHLINE_API_TOKEN` | Variable holding the token |
    pub fn from_env() -> Self {
        let base = Self::default();

        let poll_interval_secs = env::var("WASHLINE_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(base.poll_interval_secs);

        let timeout_secs = env::var("WASHLINE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(base.timeout_secs);

        Self {
            base_url: env::var("WASHLINE_API_URL").unwrap_or(base.base_url),
            path: env::var("WASHLINE_NOTIFICATIONS_PATH").unwrap_or(base.path),
            poll_interval_secs,
            timeout_secs,
            token_env: env::var("WASHLINE_TOKEN_ENV").unwrap_or(base.token_env),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if !self.path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "path must start with '/', got: {}",
                self.path
            )));
        }

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.token_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "token_env cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the feed.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
