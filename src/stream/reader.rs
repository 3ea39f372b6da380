//! The read loop of one streaming request.
//!
//! Chunks are handled strictly one at a time: every frame a chunk completes
//! is decoded and dispatched before the next chunk is awaited. Awaiting the
//! next chunk is the only suspension point, and the only place cancellation
//! is observed.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::StreamError;
use crate::models::{ChatRequest, Citation};
use crate::sse::{decode_frame, FrameParser, StreamSignal};
use crate::traits::{ByteStream, ChatTransport};

/// How a stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// `done` arrived or the body ended
    Completed,
    /// The cancellation signal fired
    Cancelled,
    /// Transport or read failure
    Failed(StreamError),
}

/// Messages a running stream sends back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// Sources for the answer being streamed
    Citations {
        stream_id: u64,
        citations: Vec<Citation>,
    },
    /// A non-empty text delta
    Token { stream_id: u64, delta: String },
    /// The stream completed; sent exactly once
    Completed { stream_id: u64 },
    /// The stream failed; sent exactly once
    Failed { stream_id: u64, error: StreamError },
}

impl StreamMessage {
    pub fn stream_id(&self) -> u64 {
        match self {
            StreamMessage::Citations { stream_id, .. }
            | StreamMessage::Token { stream_id, .. }
            | StreamMessage::Completed { stream_id }
            | StreamMessage::Failed { stream_id, .. } => *stream_id,
        }
    }
}

/// Read `body` to its end, dispatching every decoded signal in arrival order.
///
/// `on_signal` never sees [`StreamSignal::Done`]; completion is reported by
/// the returned outcome instead. Frames after `done` are not dispatched.
pub async fn read_body<F>(
    mut body: ByteStream,
    cancel: &CancellationToken,
    mut on_signal: F,
) -> StreamOutcome
where
    F: FnMut(StreamSignal),
{
    let mut parser = FrameParser::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return StreamOutcome::Cancelled,
            chunk = body.next() => chunk,
        };

        match next {
            Some(Ok(bytes)) => {
                for frame in parser.push_bytes(&bytes) {
                    match decode_frame(&frame) {
                        Some(StreamSignal::Done) => {
                            if !parser.remainder().trim().is_empty() {
                                tracing::debug!("Discarding data received after done");
                            }
                            return StreamOutcome::Completed;
                        }
                        Some(signal) => {
                            tracing::debug!(signal = signal.name(), "Stream signal");
                            on_signal(signal);
                        }
                        None => {}
                    }
                }
            }
            Some(Err(e)) if e.is_cancellation() => return StreamOutcome::Cancelled,
            Some(Err(e)) => {
                tracing::warn!(error = %e, code = e.error_code(), "Stream read failed");
                return StreamOutcome::Failed(e);
            }
            None => {
                let tail = parser.finish();
                if !tail.trim().is_empty() {
                    tracing::warn!(bytes = tail.len(), "Body ended inside an event, dropping it");
                }
                return StreamOutcome::Completed;
            }
        }
    }
}

/// Open a stream for `request` and forward its signals as [`StreamMessage`]s.
///
/// Sends `Completed` or `Failed` exactly once at the end; sends nothing more
/// once `cancel` fires.
pub async fn run_stream<M>(
    transport: Arc<dyn ChatTransport>,
    request: ChatRequest,
    stream_id: u64,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<M>,
) -> StreamOutcome
where
    M: From<StreamMessage>,
{
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return StreamOutcome::Cancelled,
        opened = transport.open_stream(&request) => opened,
    };

    let outcome = match opened {
        Ok(body) => {
            read_body(body, &cancel, |signal| {
                let message = match signal {
                    StreamSignal::Citations(citations) => StreamMessage::Citations {
                        stream_id,
                        citations,
                    },
                    StreamSignal::Delta(delta) => StreamMessage::Token { stream_id, delta },
                    StreamSignal::Done => return,
                };
                let _ = tx.send(message.into());
            })
            .await
        }
        Err(e) if e.is_cancellation() => StreamOutcome::Cancelled,
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "Failed to open chat stream");
            StreamOutcome::Failed(e)
        }
    };

    match &outcome {
        StreamOutcome::Completed => {
            tracing::info!(stream_id, "Stream completed");
            let _ = tx.send(StreamMessage::Completed { stream_id }.into());
        }
        StreamOutcome::Failed(error) => {
            let _ = tx.send(
                StreamMessage::Failed {
                    stream_id,
                    error: error.clone(),
                }
                .into(),
            );
        }
        StreamOutcome::Cancelled => {
            tracing::info!(stream_id, "Stream cancelled");
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;

    fn body(chunks: &[&str]) -> ByteStream {
        let items: Vec<Result<Bytes, StreamError>> = chunks
            .iter()
            .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
            .collect();
        Box::pin(stream::iter(items))
    }

    fn hanging(chunks: &[&str]) -> ByteStream {
        let items: Vec<Result<Bytes, StreamError>> = chunks
            .iter()
            .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
            .collect();
        Box::pin(stream::iter(items).chain(stream::pending()))
    }

    #[tokio::test]
    async fn test_signals_dispatched_in_order() {
        let mut seen = Vec::new();
        let outcome = read_body(
            body(&[
                "event: citations\ndata: [{\"source\":\"a.pdf\"}]\n\n",
                "event: token\ndata: {\"t\":\"A\"}\n\nevent: token\ndata: {\"t\":\"B\"}\n\n",
                "event: done\ndata: {}\n\n",
            ]),
            &CancellationToken::new(),
            |s| seen.push(s),
        )
        .await;

        assert_eq!(outcome, StreamOutcome::Completed);
        assert_eq!(seen.len(), 3);
        assert!(matches!(&seen[0], StreamSignal::Citations(c) if c.len() == 1));
        assert_eq!(seen[1], StreamSignal::Delta("A".to_string()));
        assert_eq!(seen[2], StreamSignal::Delta("B".to_string()));
    }

    #[tokio::test]
    async fn test_done_stops_later_frames_in_same_chunk() {
        let mut seen = Vec::new();
        let outcome = read_body(
            body(&["data: one\n\nevent: done\ndata: {}\n\ndata: two\n\n", "data: three\n\n"]),
            &CancellationToken::new(),
            |s| seen.push(s),
        )
        .await;

        assert_eq!(outcome, StreamOutcome::Completed);
        assert_eq!(seen, vec![StreamSignal::Delta("one".to_string())]);
    }

    #[tokio::test]
    async fn test_body_end_implies_completion() {
        let mut seen = Vec::new();
        let outcome = read_body(
            body(&["data: x\n\ndata: unterminated"]),
            &CancellationToken::new(),
            |s| seen.push(s),
        )
        .await;
        assert_eq!(outcome, StreamOutcome::Completed);
        assert_eq!(seen, vec![StreamSignal::Delta("x".to_string())]);
    }

    #[tokio::test]
    async fn test_read_error_fails_stream() {
        let items: Vec<Result<Bytes, StreamError>> = vec![
            Ok(Bytes::from_static(b"data: x\n\n")),
            Err(StreamError::Read {
                message: "reset".to_string(),
            }),
        ];
        let outcome = read_body(Box::pin(stream::iter(items)), &CancellationToken::new(), |_| {}).await;
        assert!(matches!(outcome, StreamOutcome::Failed(StreamError::Read { .. })));
    }

    #[tokio::test]
    async fn test_cancellation_error_from_body_is_not_failure() {
        let items: Vec<Result<Bytes, StreamError>> = vec![Err(StreamError::Cancelled)];
        let outcome = read_body(Box::pin(stream::iter(items)), &CancellationToken::new(), |_| {}).await;
        assert_eq!(outcome, StreamOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_after_first_token() {
        let cancel = CancellationToken::new();
        let mut seen = Vec::new();
        let outcome = read_body(
            hanging(&["event: token\ndata: {\"t\":\"Refunds \"}\n\n"]),
            &cancel,
            |s| {
                seen.push(s);
                cancel.cancel();
            },
        )
        .await;
        assert_eq!(outcome, StreamOutcome::Cancelled);
        assert_eq!(seen.len(), 1);
    }

    #[tokio::test]
    async fn test_run_stream_sends_single_completion() {
        let transport = crate::adapters::mock::ScriptedTransport::new();
        transport.push_stream(crate::adapters::mock::ScriptedStream::from_strs(&[
            "event: token\ndata: {\"t\":\"Hi\"}\n\n",
            "event: done\ndata: {}\n\n",
        ]));
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamMessage>();

        let outcome = run_stream(
            Arc::new(transport),
            ChatRequest::new("q"),
            7,
            CancellationToken::new(),
            tx,
        )
        .await;

        assert_eq!(outcome, StreamOutcome::Completed);
        assert_eq!(
            rx.recv().await,
            Some(StreamMessage::Token {
                stream_id: 7,
                delta: "Hi".to_string()
            })
        );
        assert_eq!(rx.recv().await, Some(StreamMessage::Completed { stream_id: 7 }));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_run_stream_transport_error_before_any_signal() {
        let transport = crate::adapters::mock::ScriptedTransport::new();
        transport.push_stream(crate::adapters::mock::ScriptedStream::Fail(
            StreamError::Transport {
                status: 500,
                detail: "boom".to_string(),
            },
        ));
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamMessage>();

        let outcome = run_stream(
            Arc::new(transport),
            ChatRequest::new("q"),
            1,
            CancellationToken::new(),
            tx,
        )
        .await;

        assert!(matches!(outcome, StreamOutcome::Failed(_)));
        assert!(matches!(
            rx.recv().await,
            Some(StreamMessage::Failed { stream_id: 1, .. })
        ));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_run_stream_cancelled_sends_nothing() {
        let transport = crate::adapters::mock::ScriptedTransport::new();
        transport.push_stream(crate::adapters::mock::ScriptedStream::hanging(&[]));
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamMessage>();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = run_stream(Arc::new(transport), ChatRequest::new("q"), 2, cancel, tx).await;

        assert_eq!(outcome, StreamOutcome::Cancelled);
        assert_eq!(rx.recv().await, None);
    }
}
