//! Stream session control.
//!
//! - `reader` - the cancellable read loop and the messages it sends
//! - `controller` - single-flight ownership of the active stream
//! - `phase` - the stream lifecycle state machine

mod controller;
mod phase;
mod reader;

pub use controller::StreamController;
pub use phase::StreamPhase;
pub use reader::{read_body, run_stream, StreamMessage, StreamOutcome};
