//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `HttpTransport` - raw HTTP exchange under the client wrapper
//! - `CredentialStore` - ambient bearer token
//! - `FileSaver` - save side channel for file responses
//! - `AIProvider` - chat-completion provider used by the controller

mod ai_provider;
mod credential_store;
mod file_saver;
mod http_error;
mod http_transport;

pub use ai_provider::{
    AIError, AIProvider, ChatMessage, CompletionRequest, CompletionResponse, FinishReason,
    GenerationParams, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use credential_store::CredentialStore;
pub use file_saver::{FileSaver, SavedFile, StorageError};
pub use http_error::{HttpError, GENERIC_SERVER_MESSAGE};
pub use http_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
