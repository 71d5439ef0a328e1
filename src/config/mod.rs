//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `XURI_CHAT` prefix and nested values use double underscores as separators.
//! Every key has a default, so an empty environment yields a working setup.
//!
//! # Example
//!
//! ```no_run
//! use xuri_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Talking to {}", config.chat.endpoint);
//! ```

mod app;
mod chat;
mod error;
mod http;

pub use app::{AppSettings, LogFormat};
pub use chat::ChatConfig;
pub use error::{ConfigError, ValidationError};
pub use self::http::HttpSettings;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub app: AppSettings,

    /// HTTP client configuration (base URL, timeout, token file, downloads)
    #[serde(default)]
    pub http: HttpSettings,

    /// Chat completion provider configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `XURI_CHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `XURI_CHAT__HTTP__TIMEOUT_SECS=30` -> `http.timeout_secs = 30`
    /// - `XURI_CHAT__CHAT__API_KEY=sk-...` -> `chat.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("XURI_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.app.validate()?;
        self.http.validate()?;
        self.chat.validate()?;
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "XURI_CHAT__APP__LOG_FORMAT",
        "XURI_CHAT__HTTP__BASE_URL",
        "XURI_CHAT__HTTP__TIMEOUT_SECS",
        "XURI_CHAT__CHAT__API_KEY",
        "XURI_CHAT__CHAT__MODEL",
        "XURI_CHAT__CHAT__INCLUDE_HISTORY",
        "XURI_CHAT__CHAT__TEMPERATURE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.http.base_url, "http://localhost:8080/api");
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.chat.model, "Qwen/Qwen2.5-7B-Instruct");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("XURI_CHAT__APP__LOG_FORMAT", "json");
        env::set_var("XURI_CHAT__HTTP__BASE_URL", "https://chat.example.com/api");
        env::set_var("XURI_CHAT__HTTP__TIMEOUT_SECS", "30");
        env::set_var("XURI_CHAT__CHAT__API_KEY", "sk-test");
        env::set_var("XURI_CHAT__CHAT__MODEL", "deepseek-ai/DeepSeek-V3");
        env::set_var("XURI_CHAT__CHAT__INCLUDE_HISTORY", "false");
        env::set_var("XURI_CHAT__CHAT__TEMPERATURE", "0.7");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.app.log_format, LogFormat::Json);
        assert_eq!(config.http.base_url, "https://chat.example.com/api");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(
            config.chat.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
        assert_eq!(config.chat.model, "deepseek-ai/DeepSeek-V3");
        assert!(!config.chat.include_history);
        assert_eq!(config.chat.temperature, Some(0.7));
    }

    #[test]
    fn test_validate_rejects_bad_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("XURI_CHAT__HTTP__TIMEOUT_SECS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
