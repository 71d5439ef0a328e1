//! HTTP client wrapper and its transport.
//!
//! - `HttpClient` - configured client with auth injection and classification
//! - `ReqwestTransport` - production `HttpTransport`

mod classify;
mod client;
mod disposition;
mod payload;
mod reqwest_transport;

pub use classify::{classify, is_file_content_type, Classification, ResponseType};
pub use client::{ApiRequest, HttpClient, HttpClientConfig, RequestOptions, DEFAULT_TIMEOUT};
pub use disposition::{filename_from_disposition, DEFAULT_DOWNLOAD_NAME};
pub use payload::{DownloadReceipt, Payload};
pub use reqwest_transport::ReqwestTransport;
