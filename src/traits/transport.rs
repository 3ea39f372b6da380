//! Chat transport trait abstraction.
//!
//! The stream controller only needs "POST a request, hand me the body as a
//! stream of byte chunks". Keeping that behind a trait lets tests script the
//! body chunk by chunk without a network.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::error::StreamError;
use crate::models::{ChatRequest, ChatResponse};

/// Response body of a streaming request, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

/// Trait for talking to the answer service.
///
/// Implementations must fail `open_stream` with [`StreamError::Transport`]
/// for a non-2xx status and [`StreamError::NoBody`] when the response has no
/// readable body, before yielding any bytes.
///
/// # Example
///
/// ```ignore
/// use ragchat::traits::ChatTransport;
/// use ragchat::models::ChatRequest;
///
/// async fn ask<T: ChatTransport>(transport: &T) -> Result<String, StreamError> {
///     let response = transport.chat(&ChatRequest::new("hello")).await?;
///     Ok(response.answer)
/// }
/// ```
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST `request` to the streaming endpoint and return the body stream.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError>;

    /// POST `request` to the one-shot endpoint.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, StreamError>;

    /// Whether the service reports itself healthy.
    async fn health(&self) -> Result<bool, StreamError>;
}
