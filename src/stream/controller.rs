//! Ownership of the single in-flight stream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::phase::StreamPhase;
use super::reader::{run_stream, StreamMessage};
use crate::error::StreamError;
use crate::models::ChatRequest;
use crate::traits::ChatTransport;

#[derive(Debug)]
struct ActiveStream {
    id: u64,
    cancel: CancellationToken,
}

/// Starts, tracks and cancels the one stream allowed at a time.
///
/// The read loop runs on a spawned task and reports back through a channel;
/// the owner feeds terminal messages back via [`StreamController::finish`].
#[derive(Debug, Default)]
pub struct StreamController {
    next_id: u64,
    active: Option<ActiveStream>,
    phase: StreamPhase,
}

impl StreamController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a stream for `request`, returning its id.
    ///
    /// Fails with [`StreamError::AlreadyStreaming`] while another stream is
    /// active.
    pub fn start<M>(
        &mut self,
        transport: Arc<dyn ChatTransport>,
        request: ChatRequest,
        tx: mpsc::UnboundedSender<M>,
    ) -> Result<u64, StreamError>
    where
        M: From<StreamMessage> + Send + 'static,
    {
        if self.active.is_some() {
            return Err(StreamError::AlreadyStreaming);
        }

        self.next_id += 1;
        let id = self.next_id;
        let cancel = CancellationToken::new();
        self.phase.transition(StreamPhase::Streaming);
        self.active = Some(ActiveStream {
            id,
            cancel: cancel.clone(),
        });

        tracing::info!(stream_id = id, "Starting chat stream");
        tokio::spawn(run_stream(transport, request, id, cancel, tx));

        Ok(id)
    }

    /// Signal the active stream to stop. Returns its id, or `None` when
    /// nothing was streaming.
    pub fn cancel(&mut self) -> Option<u64> {
        let active = self.active.take()?;
        active.cancel.cancel();
        self.phase.transition(StreamPhase::Cancelled);
        Some(active.id)
    }

    /// Record that stream `stream_id` ended with `phase`.
    ///
    /// Returns `false` for a stream that is no longer the active one, e.g. a
    /// completion racing a cancel.
    pub fn finish(&mut self, stream_id: u64, phase: StreamPhase) -> bool {
        match &self.active {
            Some(active) if active.id == stream_id => {
                if !self.phase.transition(phase) {
                    return false;
                }
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }
}

impl Drop for StreamController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{ScriptedStream, ScriptedTransport};

    fn transport(script: ScriptedStream) -> Arc<dyn ChatTransport> {
        let transport = ScriptedTransport::new();
        transport.push_stream(script);
        Arc::new(transport)
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let mut controller = StreamController::new();
        let (tx, _rx) = mpsc::unbounded_channel::<StreamMessage>();
        let t = transport(ScriptedStream::hanging(&[]));

        controller
            .start(t.clone(), ChatRequest::new("a"), tx.clone())
            .unwrap();
        let err = controller.start(t, ChatRequest::new("b"), tx).unwrap_err();
        assert_eq!(err, StreamError::AlreadyStreaming);
        assert_eq!(controller.phase(), StreamPhase::Streaming);
    }

    #[tokio::test]
    async fn test_completion_clears_active() {
        let mut controller = StreamController::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamMessage>();
        let id = controller
            .start(
                transport(ScriptedStream::from_strs(&["event: done\ndata: {}\n\n"])),
                ChatRequest::new("a"),
                tx,
            )
            .unwrap();

        assert_eq!(rx.recv().await, Some(StreamMessage::Completed { stream_id: id }));
        assert!(controller.finish(id, StreamPhase::Completed));
        assert!(!controller.is_active());
        assert_eq!(controller.phase(), StreamPhase::Completed);
    }

    #[tokio::test]
    async fn test_finish_after_cancel_is_ignored() {
        let mut controller = StreamController::new();
        let (tx, _rx) = mpsc::unbounded_channel::<StreamMessage>();
        let id = controller
            .start(transport(ScriptedStream::hanging(&[])), ChatRequest::new("a"), tx)
            .unwrap();

        assert_eq!(controller.cancel(), Some(id));
        assert!(!controller.finish(id, StreamPhase::Completed));
        assert_eq!(controller.phase(), StreamPhase::Cancelled);
        assert_eq!(controller.cancel(), None);
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let mut controller = StreamController::new();
        let (tx, _rx) = mpsc::unbounded_channel::<StreamMessage>();
        let script = ScriptedTransport::new();
        script.push_stream(ScriptedStream::hanging(&[]));
        script.push_stream(ScriptedStream::hanging(&[]));
        let t: Arc<dyn ChatTransport> = Arc::new(script);

        let first = controller.start(t.clone(), ChatRequest::new("a"), tx.clone()).unwrap();
        controller.cancel();
        let second = controller.start(t, ChatRequest::new("b"), tx).unwrap();
        assert!(second > first);
        assert_eq!(controller.active_id(), Some(second));
    }
}
