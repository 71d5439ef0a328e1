//! xuri-chat - conversational chat client
//!
//! A configured HTTP client wrapper (auth injection, response
//! classification, file downloads) under a conversation controller that
//! drives each message through `pending -> complete | error` against an
//! OpenAI-compatible completion API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod terminal;
