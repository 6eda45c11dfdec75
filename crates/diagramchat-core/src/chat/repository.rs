//! ChatRepository trait definition.
//!
//! Create/append/read/list operations for chat sessions and messages.

use diagramchat_types::chat::{ChatMessage, ChatSession, MessageRole, SessionSummary};
use diagramchat_types::error::RepositoryError;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in diagramchat-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert a session row if absent.
    ///
    /// Returns `true` when a row was inserted, `false` when the id already existed.
    fn create_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Get a chat session by its id.
    fn get_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Append a message and touch the owning session's `updated_at`.
    ///
    /// Both writes happen in one transaction. Fails with `NotFound` if the
    /// session does not exist.
    fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Messages for a session, oldest first, capped at `limit`.
    ///
    /// An unknown session yields an empty list, not an error.
    fn read_history(
        &self,
        session_id: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The newest `limit` messages for a session, returned oldest first.
    fn recent_messages(
        &self,
        session_id: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// All sessions, most recently updated first, with their message counts.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send;
}
