//! Scripted chat transport for testing.
//!
//! Each call to `open_stream` consumes the next queued [`ScriptedStream`],
//! so a test decides exactly which bytes arrive, in which pieces, and how
//! the body ends.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::models::{ChatRequest, ChatResponse};
use crate::traits::{ByteStream, ChatTransport};

/// How a scripted response body behaves.
#[derive(Debug, Clone)]
pub enum ScriptedStream {
    /// Yield the chunks, then end the body
    Chunks(Vec<Bytes>),
    /// Yield the chunks, then stay pending until the reader gives up
    ChunksThenHang(Vec<Bytes>),
    /// Yield the chunks, then fail the read
    ChunksThenError(Vec<Bytes>, StreamError),
    /// Fail before any body is available
    Fail(StreamError),
}

impl ScriptedStream {
    /// Chunks from string slices
    pub fn from_strs(chunks: &[&str]) -> Self {
        ScriptedStream::Chunks(to_bytes(chunks))
    }

    /// Chunks from string slices, then hang
    pub fn hanging(chunks: &[&str]) -> Self {
        ScriptedStream::ChunksThenHang(to_bytes(chunks))
    }
}

fn to_bytes(chunks: &[&str]) -> Vec<Bytes> {
    chunks
        .iter()
        .map(|c| Bytes::copy_from_slice(c.as_bytes()))
        .collect()
}

/// Mock transport with queued stream scripts and recorded requests.
///
/// # Example
///
/// ```ignore
/// use ragchat::adapters::mock::{ScriptedStream, ScriptedTransport};
///
/// let transport = ScriptedTransport::new();
/// transport.push_stream(ScriptedStream::from_strs(&[
///     "event: token\ndata: {\"t\":\"Hi\"}\n\n",
///     "event: done\ndata: {}\n\n",
/// ]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    streams: Arc<Mutex<VecDeque<ScriptedStream>>>,
    chat_response: Arc<Mutex<Option<Result<ChatResponse, StreamError>>>>,
    healthy: Arc<Mutex<bool>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            healthy: Arc::new(Mutex::new(true)),
            ..Self::default()
        }
    }

    /// Queue the body for the next `open_stream` call.
    pub fn push_stream(&self, script: ScriptedStream) {
        self.streams.lock().unwrap().push_back(script);
    }

    /// Set what `chat` returns.
    pub fn set_chat_response(&self, response: Result<ChatResponse, StreamError>) {
        *self.chat_response.lock().unwrap() = Some(response);
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock().unwrap() = healthy;
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &ChatRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError> {
        self.record(request);
        let script = self.streams.lock().unwrap().pop_front();

        let body: ByteStream = match script {
            None => return Err(StreamError::NoBody),
            Some(ScriptedStream::Fail(err)) => return Err(err),
            Some(ScriptedStream::Chunks(chunks)) => {
                Box::pin(stream::iter(chunks.into_iter().map(Ok)))
            }
            Some(ScriptedStream::ChunksThenHang(chunks)) => Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::pending()),
            ),
            Some(ScriptedStream::ChunksThenError(chunks, err)) => Box::pin(
                stream::iter(chunks.into_iter().map(Ok)).chain(stream::once(async move { Err(err) })),
            ),
        };
        Ok(body)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, StreamError> {
        self.record(request);
        self.chat_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(StreamError::NoBody))
    }

    async fn health(&self) -> Result<bool, StreamError> {
        Ok(*self.healthy.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(body: ByteStream) -> Vec<Result<Bytes, StreamError>> {
        body.collect().await
    }

    #[tokio::test]
    async fn test_chunks_are_yielded_in_order() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::from_strs(&["a", "b"]));

        let body = transport.open_stream(&ChatRequest::new("q")).await.unwrap();
        let items = collect(body).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from_static(b"a"));
        assert_eq!(transport.requests()[0].message, "q");
    }

    #[tokio::test]
    async fn test_fail_script_errors_before_body() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::Fail(StreamError::Transport {
            status: 500,
            detail: "boom".to_string(),
        }));
        let result = transport.open_stream(&ChatRequest::new("q")).await;
        assert!(matches!(result, Err(StreamError::Transport { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_error_after_chunks() {
        let transport = ScriptedTransport::new();
        transport.push_stream(ScriptedStream::ChunksThenError(
            vec![Bytes::from_static(b"x")],
            StreamError::Read {
                message: "reset".to_string(),
            },
        ));
        let items = collect(transport.open_stream(&ChatRequest::new("q")).await.unwrap()).await;
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_empty_queue_is_no_body() {
        let transport = ScriptedTransport::new();
        assert!(matches!(
            transport.open_stream(&ChatRequest::new("q")).await,
            Err(StreamError::NoBody)
        ));
    }

    #[tokio::test]
    async fn test_health_toggle() {
        let transport = ScriptedTransport::new();
        assert!(transport.health().await.unwrap());
        transport.set_healthy(false);
        assert!(!transport.health().await.unwrap());
    }
}
