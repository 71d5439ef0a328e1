//! OpenAI-compatible chat completion provider.
//!
//! Talks to any endpoint speaking the `/v1/chat/completions` format
//! (SiliconFlow by default). Requests go through the shared `HttpClient`,
//! so failures surface with the same rejection taxonomy as every other call.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAICompatibleConfig::new("https://api.siliconflow.cn/v1/chat/completions")
//!     .with_api_key(key)
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = OpenAICompatibleProvider::new(config, http_client);
//! ```
//!
//! An explicit API key is sent as the request's own `Authorization` header,
//! which takes precedence over the ambient login token.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::http::{HttpClient, Payload, RequestOptions};
use crate::ports::{
    AIError, AIProvider, ChatMessage, CompletionRequest, CompletionResponse, FinishReason,
    GenerationParams, ProviderInfo, TokenUsage,
};

/// Configuration for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    /// Full chat completions URL.
    pub endpoint: String,
    /// Vendor API key; when absent the login token (if any) is used.
    api_key: Option<Secret<String>>,
    /// Request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,
}

impl OpenAICompatibleConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request_options(&self) -> RequestOptions {
        let mut options = RequestOptions::default();
        if let Some(key) = &self.api_key {
            options = options.with_bearer(key.expose_secret());
        }
        if let Some(timeout) = self.timeout {
            options = options.with_timeout(timeout);
        }
        options
    }
}

/// Chat completion provider over the shared HTTP client.
pub struct OpenAICompatibleProvider {
    config: OpenAICompatibleConfig,
    client: Arc<HttpClient>,
}

impl OpenAICompatibleProvider {
    pub fn new(config: OpenAICompatibleConfig, client: Arc<HttpClient>) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl AIProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            params: &request.params,
            stream: false,
        };

        tracing::debug!(
            conversation_id = %request.metadata.conversation_id,
            trace_id = %request.metadata.trace_id,
            model = %request.model,
            message_count = request.messages.len(),
            "requesting completion"
        );

        let payload = self
            .client
            .post(&self.config.endpoint, &body, self.config.request_options())
            .await?;

        match payload {
            Payload::Json(value) => Ok(parse_completion(value)),
            other => Err(AIError::unexpected_payload(format!(
                "expected a JSON completion, got {}",
                other.kind()
            ))),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai-compatible", &self.config.endpoint)
    }
}

/// Reads the first choice out of a completion body.
///
/// A body of the wrong shape is treated as a reply without content rather
/// than an error. The content is read on its own so a malformed `usage` or
/// `model` never hides a valid reply.
fn parse_completion(value: Value) -> CompletionResponse {
    let choice = value.pointer("/choices/0");

    CompletionResponse {
        content: choice
            .and_then(|c| c.pointer("/message/content"))
            .and_then(Value::as_str)
            .map(str::to_string),
        model: value.get("model").and_then(Value::as_str).map(str::to_string),
        usage: value
            .get("usage")
            .and_then(|u| serde_json::from_value::<ChatUsage>(u.clone()).ok())
            .map(ChatUsage::into_token_usage),
        finish_reason: choice
            .and_then(|c| c.get("finish_reason"))
            .and_then(Value::as_str)
            .map(FinishReason::from_provider),
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(flatten)]
    params: &'a GenerationParams,
    stream: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: Option<u32>,
}

impl ChatUsage {
    fn into_token_usage(self) -> TokenUsage {
        let usage = TokenUsage::new(self.prompt_tokens, self.completion_tokens);
        match self.total_tokens {
            Some(total_tokens) => TokenUsage {
                total_tokens,
                ..usage
            },
            None => usage,
        }
    }
}
