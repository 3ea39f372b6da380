//! Frame to signal decoding.
//!
//! Payload parsing is best-effort. A malformed citations payload becomes an
//! empty citation set and a malformed token payload is taken as literal
//! text, so a bad frame can never fail the stream.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::events::{StreamFrame, StreamSignal};
use crate::models::Citation;

/// Keys that may carry a token's text, in the order they are tried.
pub const TOKEN_TEXT_KEYS: [&str; 5] = ["t", "token", "text", "delta", "content"];

/// Result of a JSON parse that never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonOutcome<T> {
    /// The payload parsed as `T`
    Ok(T),
    /// The payload did not parse; carries the raw text unchanged
    Fallback(String),
}

/// Parse `raw` as JSON, falling back to the raw text instead of erroring.
pub fn parse_json_or_fallback<T: DeserializeOwned>(raw: &str) -> JsonOutcome<T> {
    match serde_json::from_str(raw) {
        Ok(value) => JsonOutcome::Ok(value),
        Err(_) => JsonOutcome::Fallback(raw.to_string()),
    }
}

/// Decode a citations payload. Anything that is not a JSON array of
/// citations yields an empty set.
pub fn decode_citations(raw: &str) -> Vec<Citation> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match parse_json_or_fallback::<Vec<Citation>>(raw) {
        JsonOutcome::Ok(citations) => citations,
        JsonOutcome::Fallback(_) => {
            tracing::debug!("Unparseable citations payload, using empty set");
            Vec::new()
        }
    }
}

/// Decode a token payload into its text delta.
///
/// A JSON object contributes the first present, non-null key of
/// [`TOKEN_TEXT_KEYS`]; a bare `null` is taken as literal text; other JSON
/// values contribute nothing; a payload that is not JSON is the delta
/// verbatim. Returns `None` for an empty delta.
pub fn decode_token(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let delta = match parse_json_or_fallback::<Value>(raw) {
        JsonOutcome::Ok(Value::Object(map)) => TOKEN_TEXT_KEYS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
            .map(scalar_text)
            .unwrap_or_default(),
        JsonOutcome::Ok(Value::Null) => raw.to_string(),
        JsonOutcome::Ok(_) => String::new(),
        JsonOutcome::Fallback(text) => text,
    };

    if delta.is_empty() {
        None
    } else {
        Some(delta)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Map a frame to the signal it carries.
///
/// Returns `None` for frames that produce nothing: empty deltas and event
/// types this client does not know about.
pub fn decode_frame(frame: &StreamFrame) -> Option<StreamSignal> {
    match frame.event_type.as_str() {
        "citations" => Some(StreamSignal::Citations(decode_citations(&frame.raw_payload))),
        "token" | "message" => decode_token(&frame.raw_payload).map(StreamSignal::Delta),
        "done" => Some(StreamSignal::Done),
        other => {
            tracing::debug!(event_type = other, "Ignoring unknown stream event");
            None
        }
    }
}
