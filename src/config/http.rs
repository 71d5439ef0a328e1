//! HTTP client configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use super::is_http_url;

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Prefix for relative request paths
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// File holding the login token; defaults to the per-user data directory
    pub token_path: Option<PathBuf>,

    /// Where file responses are saved
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

impl HttpSettings {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token file location, falling back to `<data dir>/xuri-chat/token`
    pub fn token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(default_token_path)
    }

    /// Validate HTTP configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl {
                field: "http.base_url",
            });
        }
        Ok(())
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token_path: None,
            download_dir: default_download_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xuri-chat")
        .join("token")
}
