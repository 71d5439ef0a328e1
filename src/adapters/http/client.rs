//! HTTP client wrapper.
//!
//! One client instance is configured once (base URL, timeout, default
//! headers) and exposes `get`/`post`/`put`/`delete`. Every call:
//!
//! 1. resolves the path against the base URL and appends query parameters
//! 2. merges default headers, then per-request headers
//! 3. attaches `Authorization: Bearer <token>` from the credential store,
//!    unless the request already carries an `Authorization` header
//! 4. classifies the response (see `classify`) and either resolves,
//!    saves a file, or rejects
//!
//! Every rejection is logged at error level before it is returned.

use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use reqwest::Url;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use super::classify::{classify, Classification, ResponseType};
use super::payload::{DownloadReceipt, Payload};
use crate::ports::{
    CredentialStore, FileSaver, HttpError, HttpRequest, HttpTransport, TransportError,
};

/// Timeout applied when neither the client nor the request sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration fixed at client construction.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix for relative request paths.
    pub base_url: String,
    pub timeout: Duration,
    /// Headers sent with every request unless overridden per request.
    pub default_headers: HeaderMap,
}

impl HttpClientConfig {
    /// Creates a config with JSON default headers and the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            default_headers,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers; these win over the client defaults.
    pub headers: Vec<(String, String)>,
    pub response_type: ResponseType,
    /// Overrides the client timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets an explicit bearer token, taking precedence over the stored one.
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header(AUTHORIZATION.as_str(), format!("Bearer {}", token))
    }

    /// Requests the raw body; file responses are saved instead of returned.
    pub fn blob(mut self) -> Self {
        self.response_type = ResponseType::Blob;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A request as the caller describes it, before resolution.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative path, or an absolute `http(s)` URL that bypasses the base URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Configured HTTP client.
pub struct HttpClient {
    config: HttpClientConfig,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
    files: Arc<dyn FileSaver>,
}

impl HttpClient {
    pub fn new(
        config: HttpClientConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
        files: Arc<dyn FileSaver>,
    ) -> Self {
        Self {
            config,
            transport,
            credentials,
            files,
        }
    }

    /// Sends a request and resolves or rejects it.
    pub async fn send(&self, request: ApiRequest) -> Result<Payload, HttpError> {
        let method = request.method.clone();
        let path = request.path.clone();

        self.dispatch(request)
            .await
            .map_err(|err| log_rejection(&method, &path, err))
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Payload, HttpError> {
        self.send(ApiRequest::get(path).with_options(options)).await
    }

    pub async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<Payload, HttpError> {
        let body = to_json(body).map_err(|err| log_rejection(&Method::POST, path, err))?;
        self.send(ApiRequest::post(path, body).with_options(options))
            .await
    }

    pub async fn put<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<Payload, HttpError> {
        let body = to_json(body).map_err(|err| log_rejection(&Method::PUT, path, err))?;
        self.send(ApiRequest::put(path, body).with_options(options))
            .await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Payload, HttpError> {
        self.send(ApiRequest::delete(path).with_options(options))
            .await
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<Payload, HttpError> {
        let response_type = request.options.response_type;
        let prepared = self.prepare(request).await?;

        tracing::debug!(method = %prepared.method, url = %prepared.url, "sending HTTP request");

        let response = self
            .transport
            .execute(prepared)
            .await
            .map_err(map_transport_error)?;

        match classify(response, response_type) {
            Classification::Resolved(payload) => Ok(payload),
            Classification::Rejected(err) => Err(err),
            Classification::Download { filename, bytes } => {
                let saved = self
                    .files
                    .save(&filename, &bytes)
                    .await
                    .map_err(|e| HttpError::download_failed(e.to_string()))?;

                tracing::info!(
                    filename = %filename,
                    path = %saved.path.display(),
                    size_bytes = bytes.len(),
                    "file downloaded"
                );
                Ok(Payload::Downloaded(DownloadReceipt::new(filename)))
            }
        }
    }

    async fn prepare(&self, request: ApiRequest) -> Result<HttpRequest, HttpError> {
        let url = self.resolve_url(&request.path, &request.query)?;

        let mut headers = self.config.default_headers.clone();
        for (name, value) in &request.options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::local_request(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| HttpError::local_request(format!("invalid value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        if !headers.contains_key(AUTHORIZATION) {
            if let Some(token) = self.credentials.token().await {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                        .map_err(|_| HttpError::local_request("stored token is not valid header text"))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let body = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::local_request(format!("failed to serialize body: {}", e)))?;

        Ok(HttpRequest {
            method: request.method,
            url: url.into(),
            headers,
            body,
            timeout: request.options.timeout.unwrap_or(self.config.timeout),
        })
    }

    fn resolve_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, HttpError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| HttpError::local_request(format!("invalid URL {:?}: {}", raw, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn log_rejection(method: &Method, path: &str, err: HttpError) -> HttpError {
    tracing::error!(
        method = %method,
        path = %path,
        status = ?err.status(),
        error = %err,
        "HTTP request failed"
    );
    err
}

fn to_json<B: Serialize>(body: &B) -> Result<Value, HttpError> {
    serde_json::to_value(body)
        .map_err(|e| HttpError::local_request(format!("failed to serialize body: {}", e)))
}

fn map_transport_error(err: TransportError) -> HttpError {
    match err {
        TransportError::InvalidRequest(message) => HttpError::local_request(message),
        other => HttpError::network(other.to_string()),
    }
}
