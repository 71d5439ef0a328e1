//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a conversation in the sidebar.
///
/// Identifiers are small integers handed out in increasing order by a
/// [`ConversationIdSequence`], so they double as a stable display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(u64);

impl ConversationId {
    /// Wraps a raw identifier value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Monotonic allocator for [`ConversationId`]s.
///
/// Identifiers are never reused, even after the conversation holding one
/// has been deleted.
#[derive(Debug, Clone)]
pub struct ConversationIdSequence {
    next: u64,
}

impl ConversationIdSequence {
    /// Creates a sequence whose first identifier is `1`.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hands out the next identifier.
    pub fn allocate(&mut self) -> ConversationId {
        let id = ConversationId(self.next);
        self.next += 1;
        id
    }
}

impl Default for ConversationIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        let mut seq = ConversationIdSequence::new();
        assert_eq!(seq.allocate(), ConversationId::from_raw(1));
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let mut seq = ConversationIdSequence::new();
        let a = seq.allocate();
        let b = seq.allocate();
        let c = seq.allocate();
        assert!(a < b && b < c);
    }

    #[test]
    fn conversation_id_parses_from_trimmed_string() {
        let id: ConversationId = " 42 ".parse().unwrap();
        assert_eq!(id.as_u64(), 42);
    }

    #[test]
    fn conversation_id_rejects_garbage() {
        assert!("abc".parse::<ConversationId>().is_err());
    }

    #[test]
    fn conversation_id_serializes_as_number() {
        let json = serde_json::to_string(&ConversationId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn conversation_id_displays_raw_value() {
        assert_eq!(ConversationId::from_raw(3).to_string(), "3");
    }
}
