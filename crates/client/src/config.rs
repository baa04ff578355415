//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUNGROVE_API_URL` - Base URL of the storefront backend
//!
//! ## Optional
//! - `SUNGROVE_DATA_DIR` - Directory for persisted state; omitted means
//!   in-memory only (nothing survives the process)
//! - `SUNGROVE_MAX_OTP_ATTEMPTS` - Wrong codes allowed per challenge
//!   (default: 5, minimum: 1)

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::auth::DEFAULT_MAX_OTP_ATTEMPTS;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client core configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront backend.
    pub api_url: Url,
    /// Directory for persisted state; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Wrong codes allowed per OTP challenge.
    pub max_otp_attempts: u32,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the backend URL.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            data_dir: None,
            max_otp_attempts: DEFAULT_MAX_OTP_ATTEMPTS,
        }
    }

    /// Persist state under `dir` instead of keeping it in memory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = Some(dir);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = require_env("SUNGROVE_API_URL")?;
        let api_url = Url::parse(&api_url)
            .map_err(|err| ConfigError::InvalidEnvVar("SUNGROVE_API_URL".into(), err.to_string()))?;

        let data_dir = env::var("SUNGROVE_DATA_DIR").ok().map(PathBuf::from);

        let max_otp_attempts = match env::var("SUNGROVE_MAX_OTP_ATTEMPTS") {
            Ok(raw) => {
                let parsed: u32 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "SUNGROVE_MAX_OTP_ATTEMPTS".into(),
                        format!("expected a positive integer, got {raw:?}"),
                    )
                })?;
                if parsed == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "SUNGROVE_MAX_OTP_ATTEMPTS".into(),
                        "must be at least 1".into(),
                    ));
                }
                parsed
            }
            Err(_) => DEFAULT_MAX_OTP_ATTEMPTS,
        };

        Ok(Self {
            api_url,
            data_dir,
            max_otp_attempts,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new(Url::parse("https://api.example.com").unwrap());
        assert!(config.data_dir.is_none());
        assert_eq!(config.max_otp_attempts, DEFAULT_MAX_OTP_ATTEMPTS);
    }

    #[test]
    fn test_with_data_dir() {
        let config = ClientConfig::new(Url::parse("https://api.example.com").unwrap())
            .with_data_dir(PathBuf::from("/tmp/sungrove"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/sungrove")));
    }
}
