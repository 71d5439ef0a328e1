//! Rejection taxonomy of the HTTP client wrapper.
//!
//! Every failed call through `HttpClient` ends in exactly one of these
//! variants. None of them is retried.

use serde_json::Value;

/// Message used when a failed response carries no `message` field.
pub const GENERIC_SERVER_MESSAGE: &str = "request failed";

/// HTTP client rejection reasons.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// The request never produced a response (connect failure, timeout).
    #[error("no response, please check the network: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{message} (status {status})")]
    Server {
        status: u16,
        /// The body's `message` field, or [`GENERIC_SERVER_MESSAGE`].
        message: String,
        /// Parsed body when it was JSON.
        body: Option<Value>,
    },

    /// A body that should have been JSON was not.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request could not be constructed.
    #[error("request error: {0}")]
    LocalRequest(String),

    /// A file response turned out to be a JSON error object.
    #[error("server returned an error instead of a file: {body}")]
    Structured { body: Value },

    /// The file payload could not be saved locally.
    #[error("file download failed: {0}")]
    DownloadFailed(String),
}

impl HttpError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a server error, taking the message from the body when present.
    pub fn server(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_SERVER_MESSAGE)
            .to_string();

        Self::Server {
            status,
            message,
            body,
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a local request construction error.
    pub fn local_request(message: impl Into<String>) -> Self {
        Self::LocalRequest(message.into())
    }

    /// Creates a structured error from a parsed JSON body.
    pub fn structured(body: Value) -> Self {
        Self::Structured { body }
    }

    /// Creates a download failure.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed(message.into())
    }

    /// Returns the parsed server payload carried by this rejection, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Server { body, .. } => body.as_ref(),
            Self::Structured { body } => Some(body),
            _ => None,
        }
    }

    /// Returns the HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_error_uses_body_message() {
        let err = HttpError::server(500, Some(json!({"message": "server exploded"})));
        assert!(matches!(
            &err,
            HttpError::Server { status: 500, message, .. } if message == "server exploded"
        ));
        assert_eq!(err.to_string(), "server exploded (status 500)");
    }

    #[test]
    fn server_error_falls_back_to_generic_message() {
        let err = HttpError::server(502, None);
        assert_eq!(err.to_string(), "request failed (status 502)");

        let err = HttpError::server(400, Some(json!({"message": 17})));
        assert_eq!(err.to_string(), "request failed (status 400)");
    }

    #[test]
    fn network_error_mentions_connectivity() {
        let err = HttpError::network("connection refused");
        assert_eq!(
            err.to_string(),
            "no response, please check the network: connection refused"
        );
    }

    #[test]
    fn structured_error_exposes_body() {
        let body = json!({"message": "bad request"});
        let err = HttpError::structured(body.clone());
        assert_eq!(err.body(), Some(&body));
        assert_eq!(err.status(), None);
    }
}
