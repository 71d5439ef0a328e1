//! Process-level settings (logging)

use serde::Deserialize;

use super::error::ValidationError;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Default filter directive when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format of log lines
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl AppSettings {
    /// Validate logging configuration
    ///
    /// Accepts a bare level or a full `EnvFilter` directive list such as
    /// `xuri_chat=debug,info`; only bare levels are checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let level = self.log_level.trim().to_ascii_lowercase();
        if level.is_empty() {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        if !level.contains(['=', ',']) && !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
