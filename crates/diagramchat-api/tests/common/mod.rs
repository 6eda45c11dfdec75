//! Shared fixtures for router tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use diagramchat_api::http::router::build_router;
use diagramchat_api::state::AppState;
use diagramchat_core::llm::box_provider::BoxLlmProvider;
use diagramchat_core::llm::provider::LlmProvider;
use diagramchat_infra::sqlite::pool::{DatabasePool, database_url};
use diagramchat_types::config::GlobalConfig;
use diagramchat_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

pub const TEST_SECRET: &str = "router-test-secret";

/// Provider that replies with a fixed text, or fails when `reply` is `None`.
#[derive(Clone)]
pub struct ScriptedProvider {
    reply: Option<String>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Arc::default(),
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: text.clone(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            None => Err(LlmError::Provider {
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn test_app(provider: ScriptedProvider) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::new(&database_url(dir.path())).await.unwrap();
    let state = AppState::from_parts(
        pool,
        BoxLlmProvider::new(provider),
        GlobalConfig::default(),
        SecretString::from(TEST_SECRET.to_string()),
        dir.path().to_path_buf(),
    )
    .unwrap();

    TestApp {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(Method::GET);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// The `name=value` pair of the response's session cookie, if one was set.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|c| c.split(';').next())
        .map(str::to_string)
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn text_body(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
