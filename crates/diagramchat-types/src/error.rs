use thiserror::Error;

/// Errors from repository operations (used by trait definitions in diagramchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by the chat service to the request layer.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The submitted message was empty or whitespace-only.
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// The generation provider failed; the payload is the user-visible text
    /// that was also stored as an assistant turn.
    #[error("{0}")]
    Generation(String),
}
