//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`ScriptedTransport`] - Chat transport with queued, chunk-exact bodies
//! - [`RecordingSink`] - Render sink that records every call

pub mod render;
pub mod transport;

pub use render::{RecordingSink, RenderEvent};
pub use transport::{ScriptedStream, ScriptedTransport};
