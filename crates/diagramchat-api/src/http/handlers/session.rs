//! Session browsing HTTP handlers.
//!
//! Endpoints:
//! - GET /api/sessions               - All sessions, most recently updated first
//! - GET /api/sessions/{id}/messages - Stored turns of any session

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;

use crate::http::handlers::chat::history_entries;
use crate::state::AppState;

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.chat_service.sessions().await;
    Json(json!({ "sessions": sessions }))
}

/// GET /api/sessions/{id}/messages
///
/// Unknown ids yield an empty history.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let history = history_entries(state.chat_service.history(&id).await);
    Json(json!({ "history": history }))
}
