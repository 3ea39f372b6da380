//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`ChatTransport`] - Streaming and one-shot requests to the answer service
//! - [`RenderSink`] - Receiver of conversation render events

pub mod render;
pub mod transport;

pub use render::{PartialHandle, RenderSink};
pub use transport::{ByteStream, ChatTransport};
