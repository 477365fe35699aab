//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_COMPLETION_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub gemini_api_key: Option<String>,
    pub completion_model: String,
    pub completion_api_base: String,
    pub clipboard_command: Option<String>,
    pub session_idle_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load API Key (as optional) ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());

        // --- Completion Settings ---
        let completion_model =
            lookup("COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string());
        let completion_api_base = lookup("COMPLETION_API_BASE")
            .unwrap_or_else(|| DEFAULT_COMPLETION_API_BASE.to_string());

        let clipboard_command = lookup("CLIPBOARD_COMMAND").filter(|cmd| !cmd.trim().is_empty());

        let ttl_str = lookup("SESSION_IDLE_TTL_SECS").unwrap_or_else(|| "3600".to_string());
        let ttl_secs = ttl_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("SESSION_IDLE_TTL_SECS".to_string(), e.to_string())
        })?;
        if ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_IDLE_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            gemini_api_key,
            completion_model,
            completion_api_base,
            clipboard_command,
            session_idle_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// Whether the server only listens locally, so its clipboard is the user's.
    pub fn clipboard_is_local(&self) -> bool {
        self.bind_address.ip().is_loopback()
    }
}

// The API key must never reach the logs, so `Debug` is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("allowed_origin", &self.allowed_origin)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("completion_model", &self.completion_model)
            .field("completion_api_base", &self.completion_api_base)
            .field("clipboard_command", &self.clipboard_command)
            .field("session_idle_ttl", &self.session_idle_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.completion_model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.completion_api_base, DEFAULT_COMPLETION_API_BASE);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.session_idle_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = load(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "BIND_ADDRESS"
        ));
        assert!(matches!(
            load(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
        assert!(matches!(
            load(&[("SESSION_IDLE_TTL_SECS", "0")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_IDLE_TTL_SECS"
        ));
    }

    #[test]
    fn only_loopback_binds_share_the_users_clipboard() {
        assert!(load(&[]).unwrap().clipboard_is_local());
        assert!(load(&[("BIND_ADDRESS", "[::1]:3000")]).unwrap().clipboard_is_local());
        assert!(!load(&[("BIND_ADDRESS", "0.0.0.0:3000")]).unwrap().clipboard_is_local());
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let config = load(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
