//! Observability setup for diagramchat.

pub mod tracing_setup;
