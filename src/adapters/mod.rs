//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestTransport`] - Chat transport using reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::ScriptedTransport`] - Scripted response bodies
//! - [`mock::RecordingSink`] - Recorded render calls

pub mod mock;
pub mod reqwest_transport;

pub use mock::{RecordingSink, ScriptedTransport};
pub use reqwest_transport::ReqwestTransport;
