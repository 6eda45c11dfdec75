//! Chat session and message types for diagramchat.
//!
//! A session is an opaque token naming one conversation; messages are the
//! ordered turns inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Marker whose presence in assistant output means a Mermaid diagram is embedded.
pub const DIAGRAM_MARKER: &str = "```mermaid";

/// Mint a fresh, opaque session identifier.
pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// A conversation owned by one browser session.
///
/// `updated_at` moves forward every time a message is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single immutable turn within a chat session.
///
/// Messages are ordered by `created_at` (then `id`) within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Whether this message carries a fenced Mermaid block.
    pub fn has_diagram(&self) -> bool {
        contains_diagram(&self.content)
    }
}

/// A session annotated with the number of messages stored under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: ChatSession,
    pub message_count: u32,
}

/// True iff `text` contains the literal fenced-mermaid marker.
pub fn contains_diagram(text: &str) -> bool {
    text.contains(DIAGRAM_MARKER)
}
