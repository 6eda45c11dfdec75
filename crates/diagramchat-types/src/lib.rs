//! Shared domain types for diagramchat.
//!
//! Chat sessions and messages, LLM request/response shapes, the global
//! configuration file, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
