//! diagramchat application layer.
//!
//! The HTTP surface and shared state used by the `dchat` binary. Exposed as a
//! library so router tests can drive it in-process.

pub mod http;
pub mod state;
