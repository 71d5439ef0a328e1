//! HTTP Transport Port - the raw network seam under the HTTP client wrapper.
//!
//! The wrapper (`adapters::http::HttpClient`) builds fully-resolved
//! [`HttpRequest`]s and hands them to a transport; everything above the
//! transport (auth injection, response classification, error mapping) is
//! transport-independent. Production uses the reqwest adapter; tests plug in
//! a fake that returns canned [`HttpResponse`]s.

use async_trait::async_trait;
use http::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use std::time::Duration;

/// Port for executing a single HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns whatever response the server produced,
    /// regardless of status code.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A fully-resolved outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL including query string.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

/// A response as received from the wire.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Adds a header, ignoring values that are not valid header text.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Returns a header value as text, if present and visible ASCII.
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Declared content type, or the empty string.
    pub fn content_type(&self) -> &str {
        self.header_str(&CONTENT_TYPE).unwrap_or_default()
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.header_str(&CONTENT_DISPOSITION)
    }
}

/// Failures below HTTP semantics: the exchange never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No response within the request timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Could not connect to the remote host.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request could not be built or sent as given.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection dropped or the body could not be read.
    #[error("transport error: {0}")]
    Io(String),
}
