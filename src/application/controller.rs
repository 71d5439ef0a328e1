//! Conversation controller.
//!
//! Owns the conversation store and drives one message exchange at a time per
//! conversation through `idle -> pending -> {complete | error}`:
//!
//! 1. `begin_send` validates the text, appends the user message and a
//!    pending assistant placeholder, and builds the completion request
//! 2. the request is sent to the AI provider
//! 3. `complete_send` resolves the placeholder with the reply or the fixed
//!    failure text
//!
//! `send_message` runs all three steps. Front-ends that must not hold the
//! controller across the network call run the steps themselves.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::conversation::{
    Conversation, ConversationStore, Message, MessageId, MessageStatus, Role,
};
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::ports::{
    AIError, AIProvider, ChatMessage, CompletionRequest, CompletionResponse, GenerationParams,
    RequestMetadata,
};

/// Assistant text shown when the provider call fails.
pub const FALLBACK_REPLY: &str = "Request failed, please try again later.";

/// Assistant text shown when the provider answers without content.
pub const NO_CONTENT_REPLY: &str = "No content returned.";

/// What every completion request is built from.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub params: GenerationParams,
    /// Prepended as a `system` message when set.
    pub system_prompt: Option<String>,
    /// Send earlier completed messages along with the new one.
    pub include_history: bool,
}

impl ChatSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            params: GenerationParams::default(),
            system_prompt: None,
            include_history: true,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_history(mut self, include_history: bool) -> Self {
        self.include_history = include_history;
        self
    }
}

/// Rejections of controller operations. None of them mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Conversation {0} is still waiting for a reply")]
    Busy(ConversationId),

    #[error("Domain error: {0}")]
    Domain(String),
}

impl ControllerError {
    fn from_domain(err: DomainError, id: ConversationId) -> Self {
        match err.code {
            ErrorCode::ConversationNotFound => Self::NotFound(id),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField => Self::EmptyContent,
            ErrorCode::ConversationBusy => Self::Busy(id),
            _ => Self::Domain(err.to_string()),
        }
    }
}

/// An exchange that has been started but not yet resolved.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub conversation_id: ConversationId,
    pub placeholder_id: MessageId,
    pub request: CompletionRequest,
}

/// Conversation state plus the provider used to answer messages.
pub struct ConversationController {
    store: ConversationStore,
    provider: Arc<dyn AIProvider>,
    settings: ChatSettings,
}

impl ConversationController {
    pub fn new(provider: Arc<dyn AIProvider>, settings: ChatSettings) -> Self {
        Self {
            store: ConversationStore::new(),
            provider,
            settings,
        }
    }

    /// Creates a conversation and makes it active.
    pub fn create_conversation(&mut self) -> Conversation {
        let conversation = self.store.create();
        tracing::debug!(conversation_id = %conversation.id(), "conversation created");
        conversation
    }

    /// Deletes a conversation and its history.
    pub fn delete_conversation(&mut self, id: ConversationId) -> Result<Conversation, ControllerError> {
        let removed = self
            .store
            .remove(id)
            .map_err(|e| ControllerError::from_domain(e, id))?;

        tracing::debug!(
            conversation_id = %id,
            active = ?self.store.active_id(),
            "conversation deleted"
        );
        Ok(removed)
    }

    pub fn select_conversation(&mut self, id: ConversationId) -> Result<(), ControllerError> {
        self.store
            .select(id)
            .map_err(|e| ControllerError::from_domain(e, id))
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.store.conversations()
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.store.active()
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.store.active_id()
    }

    pub fn history(&self, id: ConversationId) -> Option<&[Message]> {
        self.store.history(id)
    }

    /// Appends the user message and placeholder, and builds the request.
    ///
    /// # Errors
    ///
    /// - `EmptyContent` if `text` is empty or whitespace only
    /// - `NotFound` if `id` is not a live conversation
    /// - `Busy` if the conversation already has a pending placeholder
    pub fn begin_send(
        &mut self,
        id: ConversationId,
        text: &str,
    ) -> Result<PendingSend, ControllerError> {
        if text.trim().is_empty() {
            return Err(ControllerError::EmptyContent);
        }

        let placeholder_id = self
            .store
            .append_exchange(id, text)
            .map_err(|e| ControllerError::from_domain(e, id))?;

        let request = self.build_request(id, text);
        tracing::debug!(
            conversation_id = %id,
            trace_id = %request.metadata.trace_id,
            message_count = request.messages.len(),
            "message exchange started"
        );

        Ok(PendingSend {
            conversation_id: id,
            placeholder_id,
            request,
        })
    }

    /// Resolves the placeholder of `pending` with the provider outcome.
    ///
    /// Returns the resolved assistant message, or `None` when the
    /// conversation was deleted while the request was in flight.
    pub fn complete_send(
        &mut self,
        pending: &PendingSend,
        outcome: Result<CompletionResponse, AIError>,
    ) -> Option<Message> {
        let (status, content) = match outcome {
            Ok(response) => {
                let content = response
                    .content
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| NO_CONTENT_REPLY.to_string());
                (MessageStatus::Complete, content)
            }
            Err(err) => {
                tracing::error!(
                    conversation_id = %pending.conversation_id,
                    trace_id = %pending.request.metadata.trace_id,
                    error = %err,
                    "completion request failed"
                );
                (MessageStatus::Error, FALLBACK_REPLY.to_string())
            }
        };

        match self.store.resolve_pending(
            pending.conversation_id,
            pending.placeholder_id,
            status,
            content,
        ) {
            Ok(message) => Some(message.clone()),
            Err(err) => {
                tracing::debug!(
                    conversation_id = %pending.conversation_id,
                    error = %err,
                    "dropping reply for a conversation that no longer awaits it"
                );
                None
            }
        }
    }

    /// Sends `text` in conversation `id` and waits for the assistant reply.
    ///
    /// Provider failures do not surface as errors; they resolve the
    /// placeholder to the fallback text with `Error` status.
    pub async fn send_message(
        &mut self,
        id: ConversationId,
        text: &str,
    ) -> Result<Message, ControllerError> {
        let pending = self.begin_send(id, text)?;
        let outcome = self.provider.complete(pending.request.clone()).await;

        self.complete_send(&pending, outcome)
            .ok_or(ControllerError::NotFound(id))
    }

    fn build_request(&self, id: ConversationId, text: &str) -> CompletionRequest {
        let metadata = RequestMetadata::new(id, Uuid::new_v4().to_string());
        let mut request = CompletionRequest::new(&self.settings.model, metadata)
            .with_params(self.settings.params.clone());

        if let Some(prompt) = &self.settings.system_prompt {
            request.messages.push(ChatMessage::system(prompt));
        }

        if self.settings.include_history {
            let history = self.store.history(id).unwrap_or_default();
            request.messages.extend(
                history
                    .iter()
                    .filter(|m| m.status() == MessageStatus::Complete)
                    .map(to_chat_message),
            );
        } else {
            request.messages.push(ChatMessage::user(text));
        }

        request
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    match message.role() {
        Role::User => ChatMessage::user(message.content()),
        Role::Assistant => ChatMessage::assistant(message.content()),
    }
}
