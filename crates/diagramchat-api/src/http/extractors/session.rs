//! Signed-cookie session extractor.
//!
//! The caller's chat session id travels in the `diagramchat_session` cookie as
//! `<id>.<hmac>`. Missing, malformed, or forged cookies yield no session.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};
use axum::response::AppendHeaders;

use diagramchat_infra::crypto::signer::SessionSigner;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "diagramchat_session";

/// The caller's current chat session, if a valid cookie was presented.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub chat_id: Option<String>,
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let chat_id = read_cookie(&parts.headers, SESSION_COOKIE).and_then(|token| {
            let verified = state.signer.verify(token);
            if verified.is_none() {
                tracing::debug!("ignoring session cookie with invalid signature");
            }
            verified
        });

        Ok(Self { chat_id })
    }
}

/// Find a cookie value by name across all `Cookie` headers.
fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value binding the caller to `chat_id`.
pub fn session_cookie(signer: &SessionSigner, chat_id: &str) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        signer.sign(chat_id)
    )
}

/// Response header part that sets the session cookie when `chat_id` is `Some`.
pub fn set_session_cookie(
    signer: &SessionSigner,
    chat_id: Option<&str>,
) -> AppendHeaders<Option<(HeaderName, String)>> {
    AppendHeaders(chat_id.map(|id| (SET_COOKIE, session_cookie(signer, id))))
}
