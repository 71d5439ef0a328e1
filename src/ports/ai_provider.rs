//! AI Provider Port - Interface for chat-completion integrations.
//!
//! This port abstracts the third-party completion API so the conversation
//! controller can request a reply without knowing about HTTP, auth headers
//! or response shapes.
//!
//! # Design
//!
//! - Non-streaming only; one request yields one complete reply
//! - Generation parameters are opaque to the controller and passed through
//!   verbatim into the request body
//! - Missing reply content is not an error; the caller decides the fallback

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ConversationId;
use crate::ports::HttpError;

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, endpoint).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Conversation messages (history + current user message).
    pub messages: Vec<ChatMessage>,
    /// Sampling and length options.
    pub params: GenerationParams,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates an empty request for `model`.
    pub fn new(model: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            params: GenerationParams::default(),
            metadata,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
        self
    }

    /// Sets the generation parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// A message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// Generation options forwarded untouched to the provider.
///
/// Known options are typed for configuration; anything else a caller needs
/// (`stop`, `response_format`, vendor-specific knobs) goes in `extra` and is
/// flattened into the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Conversation the request belongs to.
    pub conversation_id: ConversationId,
    /// Trace ID for correlating log lines.
    pub trace_id: String,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(conversation_id: ConversationId, trace_id: impl Into<String>) -> Self {
        Self {
            conversation_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Content of the first choice, if the provider returned any.
    pub content: Option<String>,
    /// Model that generated the response, when reported.
    pub model: Option<String>,
    /// Token usage, when reported.
    pub usage: Option<TokenUsage>,
    /// Why the model stopped generating.
    pub finish_reason: Option<FinishReason>,
}

impl CompletionResponse {
    /// Creates a response carrying only content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// Anything else the provider reports.
    Other,
}

impl FinishReason {
    /// Maps a provider string to a finish reason.
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai-compatible", "mock").
    pub name: String,
    /// Endpoint the provider talks to.
    pub endpoint: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    /// The HTTP client rejected the call.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The call resolved with something other than a JSON completion
    /// (a downloaded file, raw bytes, plain text).
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl AIError {
    /// Creates an unexpected payload error.
    pub fn unexpected_payload(message: impl Into<String>) -> Self {
        Self::UnexpectedPayload(message.into())
    }
}
