//! Conversation entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp};

/// An entry in the conversation list.
///
/// Conversations are immutable once created; their messages live in the
/// store's history map keyed by [`ConversationId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    created_at: Timestamp,
}

impl Conversation {
    /// Creates a conversation with the default title for `id`.
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            title: format!("New chat {}", id),
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_title_embeds_id() {
        let conv = Conversation::new(ConversationId::from_raw(12));
        assert_eq!(conv.title(), "New chat 12");
        assert_eq!(conv.id(), ConversationId::from_raw(12));
    }
}
