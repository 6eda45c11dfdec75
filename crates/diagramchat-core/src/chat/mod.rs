//! Chat session and message abstractions for diagramchat.
//!
//! - `repository`: the `ChatRepository` port the SQLite layer implements
//! - `context`: context-window slicing and prompt assembly
//! - `service`: the request-facing `ChatService`

pub mod context;
pub mod repository;
pub mod service;
