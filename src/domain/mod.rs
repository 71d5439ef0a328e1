//! Domain layer containing the chat vocabulary and its invariants.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `conversation` - Conversations, messages and the in-memory store

pub mod conversation;
pub mod foundation;
