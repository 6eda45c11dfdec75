//! Application error type mapping to HTTP status codes and the flat
//! `{ "error": ... }` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use diagramchat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Validation or generation failure from the chat service.
    Chat(ChatError),
    /// Anything else; rendered as `Server error: <detail>`.
    Internal(String),
}

impl AppError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        AppError::Internal(detail.to_string())
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<minijinja::Error> for AppError {
    fn from(e: minijinja::Error) -> Self {
        AppError::internal(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Chat(e @ ChatError::EmptyMessage) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Chat(ChatError::Generation(msg)) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server error: {detail}"),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
