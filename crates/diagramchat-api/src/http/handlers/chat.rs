//! Conversation HTTP handlers bound to the caller's cookie session.
//!
//! Endpoints:
//! - POST /api/send_message - Send one user turn, get the assistant reply
//! - POST /api/new_chat     - Start a fresh session
//! - GET  /api/chat_history - Stored turns of the current session

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use diagramchat_types::chat::{ChatMessage, MessageRole};

use crate::http::error::AppError;
use crate::http::extractors::session::{SessionContext, set_session_cookie};
use crate::state::{AppState, ConcreteChatService};

/// Request body for sending a message.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

/// One stored turn as returned by the history endpoints.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for HistoryEntry {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
            timestamp: message.created_at,
        }
    }
}

pub fn history_entries(messages: Vec<ChatMessage>) -> Vec<HistoryEntry> {
    messages.into_iter().map(HistoryEntry::from).collect()
}

/// POST /api/send_message
pub async fn send_message(
    State(state): State<AppState>,
    session: SessionContext,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: SendMessageRequest = serde_json::from_slice(&body).map_err(AppError::internal)?;

    // Reject before touching the store so an empty send never mints a session.
    let text = ConcreteChatService::validate_message(&request.message)?;

    let (chat_id, minted) = state
        .chat_service
        .ensure_session(session.chat_id.as_deref())
        .await;
    let cookie = set_session_cookie(&state.signer, minted.then_some(chat_id.as_str()));

    let response = match state.chat_service.send_message(&chat_id, text).await {
        Ok(reply) => (
            cookie,
            Json(json!({
                "response": reply.response,
                "has_diagram": reply.has_diagram,
            })),
        )
            .into_response(),
        // The user turn is already stored, so a minted cookie must still be sent.
        Err(e) => (cookie, AppError::from(e)).into_response(),
    };

    Ok(response)
}

/// POST /api/new_chat
pub async fn new_chat(State(state): State<AppState>) -> Response {
    let chat_id = state.chat_service.open_session().await;
    tracing::info!(chat_id = %chat_id, "new chat started");

    (
        set_session_cookie(&state.signer, Some(chat_id.as_str())),
        Json(json!({ "success": true, "chat_id": chat_id })),
    )
        .into_response()
}

/// GET /api/chat_history
pub async fn chat_history(
    State(state): State<AppState>,
    session: SessionContext,
) -> Json<serde_json::Value> {
    let history = match session.chat_id {
        Some(chat_id) => history_entries(state.chat_service.history(&chat_id).await),
        None => Vec::new(),
    };

    Json(json!({ "history": history }))
}
