//! Conversation domain module.
//!
//! Conversations, their append-only message histories, and the store that
//! keeps histories and the active selection consistent with the list.

mod conversation;
mod message;
mod store;

pub use conversation::Conversation;
pub use message::{Message, MessageId, MessageStatus, Role, PENDING_PLACEHOLDER};
pub use store::ConversationStore;
