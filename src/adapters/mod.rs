//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `http` - HTTP client wrapper and reqwest transport
//! - `credentials` - bearer token sources
//! - `download` - local file saving for file responses
//! - `ai` - chat completion providers

pub mod ai;
pub mod credentials;
pub mod download;
pub mod http;

pub use ai::{MockAIProvider, OpenAICompatibleConfig, OpenAICompatibleProvider};
pub use credentials::{FileCredentialStore, InMemoryCredentialStore};
pub use download::DirectoryFileSaver;
pub use self::http::{
    ApiRequest, DownloadReceipt, HttpClient, HttpClientConfig, Payload, ReqwestTransport,
    RequestOptions, ResponseType,
};
