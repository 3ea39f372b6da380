//! Frame and signal types produced while reading the chat stream.

use crate::models::Citation;

/// Event type assumed for a block that never names one.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// One fully delimited event block, before semantic decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    /// Value of the `event:` field, or [`DEFAULT_EVENT_TYPE`]
    pub event_type: String,
    /// All `data:` values of the block concatenated without separators
    pub raw_payload: String,
}

impl StreamFrame {
    pub fn new(event_type: impl Into<String>, raw_payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            raw_payload: raw_payload.into(),
        }
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: token")
    Event(String),
    /// Data payload (e.g., "data: {\"t\": \"hello\"}")
    Data(String),
    /// Blank line inside a block
    Empty,
    /// Comment or unrecognized line
    Comment(String),
}

/// Semantic signal decoded from a frame
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
    /// The sources backing the answer being streamed
    Citations(Vec<Citation>),
    /// A non-empty fragment of answer text
    Delta(String),
    /// The service finished the answer
    Done,
}

impl StreamSignal {
    /// Returns the signal name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StreamSignal::Citations(_) => "citations",
            StreamSignal::Delta(_) => "delta",
            StreamSignal::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_name() {
        assert_eq!(StreamSignal::Done.name(), "done");
        assert_eq!(StreamSignal::Delta("x".to_string()).name(), "delta");
        assert_eq!(StreamSignal::Citations(Vec::new()).name(), "citations");
    }
}
