//! Server-rendered HTML pages.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;

use crate::http::error::AppError;
use crate::http::extractors::session::{SessionContext, set_session_cookie};
use crate::http::handlers::chat::history_entries;
use crate::http::templates::{CHAT_TEMPLATE, INDEX_TEMPLATE};
use crate::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state.templates.get_template(INDEX_TEMPLATE)?.render(context! {})?;
    Ok(Html(html))
}

/// GET /chat
///
/// Opens a session for first-time visitors and renders the stored history.
pub async fn chat(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    let (chat_id, minted) = state
        .chat_service
        .ensure_session(session.chat_id.as_deref())
        .await;
    let history = history_entries(state.chat_service.history(&chat_id).await);

    let html = state.templates.get_template(CHAT_TEMPLATE)?.render(context! {
        chat_id => &chat_id,
        history => history,
    })?;

    Ok((
        set_session_cookie(&state.signer, minted.then_some(chat_id.as_str())),
        Html(html),
    )
        .into_response())
}
