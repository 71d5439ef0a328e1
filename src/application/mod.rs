//! Application layer - orchestrates the conversation domain and the AI port.

mod controller;

pub use controller::{
    ChatSettings, ControllerError, ConversationController, PendingSend, FALLBACK_REPLY,
    NO_CONTENT_REPLY,
};
