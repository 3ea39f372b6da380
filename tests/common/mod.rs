//! Common test utilities for integration tests.
//!
//! Helpers for building event-stream bodies and for driving an [`App`]
//! until its in-flight answer settles.
//!
//! # Example
//!
//! ```ignore
//! use common::{chunks, done_event, token_event};
//!
//! transport.push_stream(chunks(&[token_event("Hi"), done_event()]));
//! ```

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use ragchat::adapters::mock::{RecordingSink, ScriptedStream, ScriptedTransport};
use ragchat::app::App;
use ragchat::config::ClientConfig;

/// One event block, terminated by the blank line.
pub fn sse_event(event: Option<&str>, data: &str) -> String {
    let mut block = String::new();
    if let Some(event) = event {
        block.push_str(&format!("event: {}\n", event));
    }
    for line in data.split('\n') {
        block.push_str(&format!("data: {}\n", line));
    }
    block.push('\n');
    block
}

/// A token event carrying `text` in the `t` field.
pub fn token_event(text: &str) -> String {
    let payload = serde_json::json!({ "t": text }).to_string();
    sse_event(Some("token"), &payload)
}

/// A citations event from a raw JSON array.
pub fn citations_event(json: &str) -> String {
    sse_event(Some("citations"), json)
}

pub fn done_event() -> String {
    sse_event(Some("done"), "{}")
}

/// A body that yields each event as its own chunk, then ends.
pub fn chunks(events: &[String]) -> ScriptedStream {
    ScriptedStream::Chunks(events.iter().map(|e| Bytes::from(e.clone())).collect())
}

/// A body that yields each event as its own chunk, then stays open.
pub fn hanging(events: &[String]) -> ScriptedStream {
    ScriptedStream::ChunksThenHang(events.iter().map(|e| Bytes::from(e.clone())).collect())
}

/// An app wired to a scripted transport and a recording sink, with the
/// startup render already cleared from the sink.
pub fn scripted_app(transport: &ScriptedTransport) -> App<RecordingSink> {
    let mut app = App::new(
        Arc::new(transport.clone()),
        RecordingSink::new(),
        &ClientConfig::default(),
    );
    app.sink.clear();
    app
}

/// Yield until the transport has seen `count` requests, so a spawned stream
/// task has consumed its script before the test acts on it.
pub async fn wait_for_requests(transport: &ScriptedTransport, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while transport.requests().len() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("stream task never opened its request");
}

/// Feed spawned-task messages back into `app` until nothing is streaming.
///
/// Panics if the stream does not settle within two seconds.
pub async fn drive_until_idle(app: &mut App<RecordingSink>) {
    let mut rx = app
        .message_rx
        .take()
        .expect("message receiver already taken");

    while app.is_streaming() {
        let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("stream did not settle in time")
            .expect("message channel closed");
        app.handle_message(message);
    }

    app.message_rx = Some(rx);
}

/// Feed exactly `count` messages into `app`.
pub async fn drive_messages(app: &mut App<RecordingSink>, count: usize) {
    let mut rx = app
        .message_rx
        .take()
        .expect("message receiver already taken");

    for _ in 0..count {
        let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("message did not arrive in time")
            .expect("message channel closed");
        app.handle_message(message);
    }

    app.message_rx = Some(rx);
}
