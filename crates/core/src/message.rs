//! Message and EventStream domain types.
//!
//! These are the core value objects that flow through the system:
//! the orchestrator appends role-tagged messages to the event stream,
//! and the whole stream is the conversational context sent to the
//! completion provider on every turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (operating principles, injected knowledge)
    System,
    /// The task objective and execution observations
    User,
    /// Code the agent decided to run
    Assistant,
}

/// A single message in the event stream. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The agent's sole memory of a run: an ordered, append-only log of
/// role-tagged messages.
///
/// No deletion, no reordering, no mutation of existing entries. Roles are
/// informational only — the stream performs no validation of role
/// alternation. There is no truncation or summarization; unbounded growth
/// over a long run is an accepted limitation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventStream {
    messages: Vec<Message>,
}

impl EventStream {
    /// Create a new empty event stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the stream.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Read-only view of the entire stream, in insertion order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Read-only view of the last `n` messages (fewer if the stream is shorter).
    pub fn last_n(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
