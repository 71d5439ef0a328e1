//! File Saver Port - side channel for payloads classified as downloads.

use async_trait::async_trait;
use std::path::PathBuf;

/// Port for persisting a downloaded file under a derived name.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Saves `bytes` as `filename`, returning where it ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<SavedFile, StorageError>;
}

/// Where a downloaded file was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Name the file was saved under (after sanitizing).
    pub filename: String,
    pub path: PathBuf,
}

/// Errors from saving a downloaded file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Nothing usable remained of the filename after sanitizing.
    #[error("Invalid filename: {filename:?}")]
    InvalidFilename { filename: String },

    /// File is too large.
    #[error("File too large: {size_bytes} bytes (max: {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

impl StorageError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an invalid filename error.
    pub fn invalid_filename(filename: impl Into<String>) -> Self {
        Self::InvalidFilename {
            filename: filename.into(),
        }
    }

    /// Creates a file too large error.
    pub fn file_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            max_bytes,
        }
    }
}
