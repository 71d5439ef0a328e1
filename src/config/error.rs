//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid request timeout: must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Invalid URL for {field}: must start with http:// or https://")]
    InvalidUrl { field: &'static str },

    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("{name} out of range: {value} (allowed {min}..={max})")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
