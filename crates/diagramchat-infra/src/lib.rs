//! Infrastructure implementations for diagramchat.
//!
//! Adapters behind the ports defined in `diagramchat-core`: the SQLite chat
//! store, the OpenAI-compatible completion client, session-cookie signing,
//! and configuration/secret loading.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
