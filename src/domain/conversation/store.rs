//! In-memory conversation store.
//!
//! Owns the conversation list, the per-conversation message histories and the
//! active selection, and keeps the three consistent:
//!
//! - every history key belongs to a live conversation
//! - the active selection names a live conversation or is unset
//! - at most one pending assistant placeholder exists per conversation

use std::collections::HashMap;

use super::{Conversation, Message, MessageId, MessageStatus};
use crate::domain::foundation::{ConversationId, ConversationIdSequence, DomainError, ErrorCode};

/// Conversations, histories and the active selection.
#[derive(Debug, Default)]
pub struct ConversationStore {
    /// Most recent first.
    conversations: Vec<Conversation>,
    histories: HashMap<ConversationId, Vec<Message>>,
    active: Option<ConversationId>,
    ids: ConversationIdSequence,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conversation at the top of the list and makes it active.
    pub fn create(&mut self) -> Conversation {
        let conversation = Conversation::new(self.ids.allocate());
        let id = conversation.id();

        self.conversations.insert(0, conversation.clone());
        self.histories.insert(id, Vec::new());
        self.active = Some(id);

        conversation
    }

    /// Removes a conversation together with its history.
    ///
    /// If it was active, selection falls to the first remaining conversation.
    pub fn remove(&mut self, id: ConversationId) -> Result<Conversation, DomainError> {
        let position = self
            .conversations
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| not_found(id))?;

        let removed = self.conversations.remove(position);
        self.histories.remove(&id);

        if self.active == Some(id) {
            self.active = self.conversations.first().map(Conversation::id);
        }

        Ok(removed)
    }

    /// Makes `id` the active conversation.
    pub fn select(&mut self, id: ConversationId) -> Result<(), DomainError> {
        if !self.contains(id) {
            return Err(not_found(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.histories.contains_key(&id)
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.active
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn history(&self, id: ConversationId) -> Option<&[Message]> {
        self.histories.get(&id).map(Vec::as_slice)
    }

    /// Returns true if the conversation has a placeholder awaiting its reply.
    pub fn has_pending(&self, id: ConversationId) -> bool {
        self.histories
            .get(&id)
            .is_some_and(|h| h.iter().any(Message::is_pending))
    }

    /// Appends a user message followed by a pending assistant placeholder.
    ///
    /// Nothing is appended unless every check passes. Returns the
    /// placeholder's id so the caller can resolve it later.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `text` is empty or whitespace only
    /// - `ConversationNotFound` if `id` is not live
    /// - `ConversationBusy` if a placeholder is already pending
    pub fn append_exchange(
        &mut self,
        id: ConversationId,
        text: impl Into<String>,
    ) -> Result<MessageId, DomainError> {
        let user = Message::user(text)?;
        let history = self.histories.get_mut(&id).ok_or_else(|| not_found(id))?;

        if history.iter().any(Message::is_pending) {
            return Err(DomainError::new(
                ErrorCode::ConversationBusy,
                format!("Conversation {} is waiting for a reply", id),
            ));
        }

        let placeholder = Message::pending_assistant();
        let placeholder_id = *placeholder.id();
        history.push(user);
        history.push(placeholder);

        Ok(placeholder_id)
    }

    /// Resolves the pending placeholder `message_id` in conversation `id`.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the conversation was deleted meanwhile
    /// - `NoPendingMessage` if no pending message carries `message_id`
    pub fn resolve_pending(
        &mut self,
        id: ConversationId,
        message_id: MessageId,
        status: MessageStatus,
        content: impl Into<String>,
    ) -> Result<&Message, DomainError> {
        let history = self.histories.get_mut(&id).ok_or_else(|| not_found(id))?;

        let message = history
            .iter_mut()
            .find(|m| *m.id() == message_id && m.is_pending())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::NoPendingMessage,
                    format!("No pending message {} in conversation {}", message_id, id),
                )
            })?;

        message.resolve(status, content)?;
        Ok(message)
    }
}

fn not_found(id: ConversationId) -> DomainError {
    DomainError::new(
        ErrorCode::ConversationNotFound,
        format!("Conversation {} not found", id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;
    use proptest::prelude::*;

    mod lifecycle {
        use super::*;

        #[test]
        fn create_makes_new_conversation_active_and_first() {
            let mut store = ConversationStore::new();
            let first = store.create();
            let second = store.create();

            assert_eq!(store.active_id(), Some(second.id()));
            assert_eq!(store.conversations()[0].id(), second.id());
            assert_eq!(store.conversations()[1].id(), first.id());
            assert_eq!(store.history(second.id()).unwrap().len(), 0);
        }

        #[test]
        fn remove_drops_conversation_and_history_together() {
            let mut store = ConversationStore::new();
            let conv = store.create();
            store.append_exchange(conv.id(), "hello").unwrap();

            store.remove(conv.id()).unwrap();

            assert!(store.get(conv.id()).is_none());
            assert!(store.history(conv.id()).is_none());
        }

        #[test]
        fn remove_unknown_is_not_found() {
            let mut store = ConversationStore::new();
            store.create();
            let err = store.remove(ConversationId::from_raw(99)).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConversationNotFound);
            assert_eq!(store.conversations().len(), 1);
        }

        #[test]
        fn removing_inactive_keeps_selection() {
            let mut store = ConversationStore::new();
            let a = store.create();
            let b = store.create();

            store.remove(a.id()).unwrap();
            assert_eq!(store.active_id(), Some(b.id()));
        }

        #[test]
        fn removing_last_unsets_selection() {
            let mut store = ConversationStore::new();
            let only = store.create();
            store.remove(only.id()).unwrap();
            assert_eq!(store.active_id(), None);
            assert!(store.active().is_none());
        }

        #[test]
        fn select_unknown_is_rejected() {
            let mut store = ConversationStore::new();
            let a = store.create();
            assert!(store.select(ConversationId::from_raw(42)).is_err());
            assert_eq!(store.active_id(), Some(a.id()));
        }

        #[test]
        fn ids_are_not_reused_after_delete() {
            let mut store = ConversationStore::new();
            let a = store.create();
            store.remove(a.id()).unwrap();
            let b = store.create();
            assert!(b.id() > a.id());
        }
    }

    mod exchanges {
        use super::*;

        #[test]
        fn append_exchange_adds_user_then_pending_placeholder() {
            let mut store = ConversationStore::new();
            let conv = store.create();

            let placeholder = store.append_exchange(conv.id(), "hello").unwrap();

            let history = store.history(conv.id()).unwrap();
            assert_eq!(history.len(), 2);
            assert_eq!(history[0].role(), Role::User);
            assert_eq!(history[0].content(), "hello");
            assert_eq!(history[1].role(), Role::Assistant);
            assert_eq!(*history[1].id(), placeholder);
            assert!(history[1].is_pending());
        }

        #[test]
        fn second_exchange_while_pending_is_busy() {
            let mut store = ConversationStore::new();
            let conv = store.create();
            store.append_exchange(conv.id(), "one").unwrap();

            let err = store.append_exchange(conv.id(), "two").unwrap_err();
            assert_eq!(err.code, ErrorCode::ConversationBusy);
            assert_eq!(store.history(conv.id()).unwrap().len(), 2);
        }

        #[test]
        fn exchange_on_unknown_conversation_is_not_found() {
            let mut store = ConversationStore::new();
            let err = store
                .append_exchange(ConversationId::from_raw(5), "hello")
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ConversationNotFound);
        }

        #[test]
        fn resolve_pending_completes_placeholder() {
            let mut store = ConversationStore::new();
            let conv = store.create();
            let placeholder = store.append_exchange(conv.id(), "hello").unwrap();

            let msg = store
                .resolve_pending(conv.id(), placeholder, MessageStatus::Complete, "hi")
                .unwrap();
            assert_eq!(msg.content(), "hi");
            assert!(!store.has_pending(conv.id()));
        }

        #[test]
        fn resolve_pending_twice_fails() {
            let mut store = ConversationStore::new();
            let conv = store.create();
            let placeholder = store.append_exchange(conv.id(), "hello").unwrap();
            store
                .resolve_pending(conv.id(), placeholder, MessageStatus::Error, "failed")
                .unwrap();

            let err = store
                .resolve_pending(conv.id(), placeholder, MessageStatus::Complete, "late")
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::NoPendingMessage);
        }

        #[test]
        fn resolve_after_delete_is_not_found() {
            let mut store = ConversationStore::new();
            let conv = store.create();
            let placeholder = store.append_exchange(conv.id(), "hello").unwrap();
            store.remove(conv.id()).unwrap();

            let err = store
                .resolve_pending(conv.id(), placeholder, MessageStatus::Complete, "hi")
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ConversationNotFound);
        }
    }

    proptest! {
        #[test]
        fn deleting_active_selects_first_remaining(count in 1usize..12, pick in 0usize..12) {
            let mut store = ConversationStore::new();
            for _ in 0..count {
                store.create();
            }
            let target = store.conversations()[pick % count].id();
            store.select(target).unwrap();

            store.remove(target).unwrap();

            let expected = store.conversations().first().map(Conversation::id);
            prop_assert_eq!(store.active_id(), expected);
            prop_assert_eq!(store.conversations().len(), count - 1);
        }

        #[test]
        fn whitespace_text_never_mutates_history(text in "[ \t\r\n]{0,16}") {
            let mut store = ConversationStore::new();
            let conv = store.create();

            prop_assert!(store.append_exchange(conv.id(), text).is_err());
            prop_assert_eq!(store.history(conv.id()).unwrap().len(), 0);
        }
    }
}
