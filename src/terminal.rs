//! Line-oriented terminal front-end: command parsing and rendering.
//!
//! The binary reads stdin line by line, turns each line into a [`Command`]
//! and prints what the render functions return. Nothing here touches the
//! network or the controller directly.

use std::fmt::Write as _;
use thiserror::Error;

use crate::domain::conversation::{Conversation, Message, MessageStatus, Role};
use crate::domain::foundation::ConversationId;

/// Shown when no conversation is selected.
pub const WELCOME_TITLE: &str = "Welcome to Xuri AI Chat";
pub const WELCOME_HINT: &str = "Pick a conversation with /select <id> or start one with /new.";

/// Shown for a selected conversation without messages.
pub const GREETING: &str = "Hello, how can I help you?";

pub const HELP: &str = "\
Commands:
  /new            start a new conversation
  /list           list conversations
  /select <id>    switch to a conversation
  /delete <id>    delete a conversation
  /help           show this help
  /quit           exit
Anything else is sent as a message to the active conversation.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Select(ConversationId),
    Delete(ConversationId),
    Help,
    Quit,
    /// Text to send to the active conversation.
    Send(String),
    /// Blank line.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),

    #[error("/{command} needs a conversation id")]
    MissingId { command: &'static str },

    #[error("not a conversation id: {0:?}")]
    InvalidId(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Send(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "new" => Ok(Self::New),
            "list" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "select" => parse_id("select", arg).map(Self::Select),
            "delete" => parse_id("delete", arg).map(Self::Delete),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(command: &'static str, arg: Option<&str>) -> Result<ConversationId, CommandError> {
    let arg = arg.ok_or(CommandError::MissingId { command })?;
    arg.parse()
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

/// Renders the conversation list, marking the active entry.
pub fn render_conversation_list(
    conversations: &[Conversation],
    active: Option<ConversationId>,
) -> String {
    if conversations.is_empty() {
        return "No conversations yet. Use /new to start one.".to_string();
    }

    let mut out = String::new();
    for conversation in conversations {
        let marker = if Some(conversation.id()) == active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{} [{}] {}  {}",
            marker,
            conversation.id(),
            conversation.title(),
            conversation.created_at().list_label()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Renders the message history of the active conversation.
pub fn render_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return GREETING.to_string();
    }

    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    match message.status() {
        MessageStatus::Error => format!("{}: {} [failed]", speaker, message.content()),
        _ => format!("{}: {}", speaker, message.content()),
    }
}

pub fn render_welcome() -> String {
    format!("{}\n{}", WELCOME_TITLE, WELCOME_HINT)
}
