//! Axum router configuration with middleware.
//!
//! Pages live at `/` and `/chat`, the JSON API under `/api/`.
//! Middleware: CORS, tracing.
//!
//! The browser script is served under `/static` from the configured web
//! directory when that directory exists.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/send_message", post(handlers::chat::send_message))
        .route("/new_chat", post(handlers::chat::new_chat))
        .route("/chat_history", get(handlers::chat::chat_history))
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/sessions/{id}/messages", get(handlers::session::get_messages));

    let mut router = Router::new()
        .route("/", get(handlers::pages::index))
        .route("/chat", get(handlers::pages::chat))
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    if let Some(web_dir) = state.web_dir.as_ref().filter(|dir| dir.is_dir()) {
        router = router.nest_service("/static", ServeDir::new(web_dir));
        tracing::info!(path = %web_dir.display(), "static file serving enabled");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
