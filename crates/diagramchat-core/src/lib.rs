//! Business logic and repository trait definitions for diagramchat.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements. It depends only on `diagramchat-types` --
//! never on `diagramchat-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
