//! Message entity for conversations.
//!
//! Messages are append-only records of user/assistant exchanges. The single
//! exception is the assistant placeholder, which is created `Pending` and
//! resolved exactly once to `Complete` or `Error`.

use crate::domain::foundation::{DomainError, StateMachine, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text shown in the assistant bubble while a reply is outstanding.
pub const PENDING_PLACEHOLDER: &str = "Waiting...";

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed by the user.
    User,
    /// Reply from the completion API (or the fallback text).
    Assistant,
}

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Request in flight; only assistant placeholders are ever pending.
    Pending,
    /// Final content is present.
    Complete,
    /// The request failed; content holds the fallback text.
    Error,
}

impl StateMachine for MessageStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MessageStatus::*;
        matches!((self, target), (Pending, Complete) | (Pending, Error))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MessageStatus::*;
        match self {
            Pending => vec![Complete, Error],
            Complete | Error => vec![],
        }
    }
}

/// A message within a conversation.
///
/// # Invariants
///
/// - user messages are non-empty and always `Complete`
/// - `created_at` is set at construction and never changes
/// - status only moves `Pending -> Complete | Error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    status: MessageStatus,
    created_at: Timestamp,
}

impl Message {
    /// Creates a complete user message.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty or whitespace only
    pub fn user(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Message content cannot be empty",
            ));
        }

        Ok(Self {
            id: MessageId::new(),
            role: Role::User,
            content,
            status: MessageStatus::Complete,
            created_at: Timestamp::now(),
        })
    }

    /// Creates the pending assistant placeholder for an outstanding request.
    pub fn pending_assistant() -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: PENDING_PLACEHOLDER.to_string(),
            status: MessageStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    /// Resolves a pending placeholder to its final status and content.
    pub(crate) fn resolve(
        &mut self,
        status: MessageStatus,
        content: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(status)?;
        self.content = content.into();
        Ok(())
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true while the request behind this placeholder is in flight.
    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}
