//! Values a successful call through the HTTP client resolves to.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved value of a successful call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Parsed JSON body (`null` for an empty body).
    Json(Value),
    /// Body that was neither JSON nor declared as JSON.
    Text(String),
    /// Raw body of a `Blob` request that was not a file response.
    Bytes(Vec<u8>),
    /// File response that was saved locally.
    Downloaded(DownloadReceipt),
}

/// Result of a file response: `{"downloaded": true, "filename": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReceipt {
    pub downloaded: bool,
    pub filename: String,
}

impl DownloadReceipt {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            downloaded: true,
            filename: filename.into(),
        }
    }
}

impl Payload {
    /// Borrows the JSON body, if this is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Downloaded(_) => "download",
        }
    }
}
