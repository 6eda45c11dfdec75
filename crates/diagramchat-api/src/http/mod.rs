//! HTTP layer for diagramchat.
//!
//! Axum routes for the landing and chat pages plus the JSON API under
//! `/api/`, with signed-cookie session tracking.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod templates;
