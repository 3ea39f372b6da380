//! Incremental event framing.
//!
//! The response body arrives in arbitrary pieces. Everything up to the last
//! blank line is split into complete blocks; whatever follows it is kept as
//! the remainder and re-examined once more text arrives. No block is ever
//! parsed before its terminating blank line has been seen.

use super::events::{SseLine, StreamFrame, DEFAULT_EVENT_TYPE};
use super::utf8::Utf8Decoder;

/// Separator between two events.
pub const EVENT_DELIMITER: &str = "\n\n";

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    SseLine::Comment(line.to_string())
}

/// Split `buffer` into complete blocks and the unconsumed remainder.
///
/// The remainder is everything after the last delimiter, or the whole buffer
/// when no delimiter is present.
pub fn split_blocks(buffer: &str) -> (Vec<&str>, &str) {
    let mut parts: Vec<&str> = buffer.split(EVENT_DELIMITER).collect();
    let rest = parts.pop().unwrap_or("");
    (parts, rest)
}

/// Assemble one complete block into a frame.
///
/// The last `event:` line names the type; `data:` values are concatenated
/// directly, without a newline between them. Other lines are ignored.
pub fn parse_block(block: &str) -> StreamFrame {
    let mut event_type: Option<String> = None;
    let mut raw_payload = String::new();

    for line in block.split('\n') {
        match parse_sse_line(line) {
            SseLine::Event(name) => event_type = Some(name),
            SseLine::Data(data) => raw_payload.push_str(&data),
            SseLine::Empty | SseLine::Comment(_) => {}
        }
    }

    StreamFrame {
        event_type: event_type.unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        raw_payload,
    }
}

/// Stateful framer for one response body.
///
/// Holds the undecoded byte tail and the unterminated text remainder between
/// chunks, so the frames produced are the same however the body is split.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: String,
    utf8: Utf8Decoder,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes, returning every frame they complete.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Vec<StreamFrame> {
        let text = self.utf8.decode(bytes);
        self.push_str(&text)
    }

    /// Feed already-decoded text, returning every frame it completes.
    pub fn push_str(&mut self, text: &str) -> Vec<StreamFrame> {
        self.buffer.push_str(text);
        if self.buffer.contains("\r\n") {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let (blocks, rest) = split_blocks(&self.buffer);
        let frames: Vec<StreamFrame> = blocks
            .into_iter()
            .filter(|block| !block.trim().is_empty())
            .map(parse_block)
            .collect();
        let rest = rest.to_string();
        self.buffer = rest;

        frames
    }

    /// Text received after the last complete event
    pub fn remainder(&self) -> &str {
        &self.buffer
    }

    /// Drop all buffered state and return what was left unterminated.
    pub fn finish(&mut self) -> String {
        let tail = self.utf8.finish();
        self.buffer.push_str(&tail);
        std::mem::take(&mut self.buffer)
    }
}
