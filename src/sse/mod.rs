//! Chat stream parsing.
//!
//! The answer service streams a text event protocol:
//! - `event: <type>` - event type line (defaults to `message`)
//! - `data: <payload>` - payload line(s), concatenated without separators
//! - Empty line - ends the event
//! - Anything else - ignored
//!
//! # Module structure
//! - `events` - Frame and signal types
//! - `parser` - Incremental framing (`FrameParser`, `split_blocks`, `parse_block`)
//! - `decoder` - Frame to signal decoding with best-effort JSON
//! - `utf8` - Incremental UTF-8 decoding of body chunks

mod decoder;
mod events;
mod parser;
mod utf8;

pub use decoder::{
    decode_citations, decode_frame, decode_token, parse_json_or_fallback, JsonOutcome,
    TOKEN_TEXT_KEYS,
};
pub use events::{SseLine, StreamFrame, StreamSignal, DEFAULT_EVENT_TYPE};
pub use parser::{parse_block, parse_sse_line, split_blocks, FrameParser, EVENT_DELIMITER};
pub use utf8::Utf8Decoder;
