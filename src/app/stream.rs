//! Applying stream progress to the conversation.

use crate::error::StreamError;
use crate::models::Citation;
use crate::stream::{StreamMessage, StreamPhase};
use crate::traits::RenderSink;

use super::{App, EMPTY_ANSWER_FALLBACK};

impl<S: RenderSink> App<S> {
    /// Apply one message from the running stream. Messages from a stream
    /// that is no longer current (stopped, superseded) are dropped.
    pub fn handle_stream_message(&mut self, message: StreamMessage) {
        let current = self.state.streaming.as_ref().map(|turn| turn.stream_id);
        if current != Some(message.stream_id()) {
            tracing::debug!(stream_id = message.stream_id(), "Dropping message from stale stream");
            return;
        }

        match message {
            StreamMessage::Citations { citations, .. } => self.on_citations(citations),
            StreamMessage::Token { delta, .. } => self.on_token(&delta),
            StreamMessage::Completed { stream_id } => {
                self.controller.finish(stream_id, StreamPhase::Completed);
                self.on_done();
            }
            StreamMessage::Failed { stream_id, error } => {
                self.controller.finish(stream_id, StreamPhase::Failed);
                self.on_failed(&error);
            }
        }
    }

    /// Citations are held until the answer is committed, never rendered on
    /// arrival. A later citations event replaces an earlier one.
    fn on_citations(&mut self, citations: Vec<Citation>) {
        if let Some(turn) = self.state.streaming.as_mut() {
            turn.citations = citations;
        }
    }

    fn on_token(&mut self, delta: &str) {
        let Some(turn) = self.state.streaming.as_mut() else {
            return;
        };
        turn.text.push_str(delta);
        if let Some(handle) = turn.handle {
            self.sink.render_assistant_partial(handle, &turn.text);
        }
    }

    fn on_done(&mut self) {
        let Some(turn) = self.state.streaming.take() else {
            return;
        };
        self.state.waiting = false;

        let trimmed = turn.text.trim();
        let final_text = if trimmed.is_empty() {
            EMPTY_ANSWER_FALLBACK
        } else {
            trimmed
        };

        if let Some(session) = self.state.session_mut(&turn.session_id) {
            session.append_assistant_turn(final_text, turn.citations.clone());
        }
        if let Some(handle) = turn.handle {
            self.sink.settle_partial(handle, false);
        }
        if self.state.is_active(&turn.session_id) {
            self.sink.render_assistant_final(final_text, &turn.citations);
        }
        tracing::info!(
            stream_id = turn.stream_id,
            chars = final_text.len(),
            citations = turn.citations.len(),
            "Answer committed"
        );
    }

    fn on_failed(&mut self, error: &StreamError) {
        let Some(turn) = self.state.streaming.take() else {
            return;
        };
        self.state.waiting = false;

        if let Some(handle) = turn.handle {
            self.sink.settle_partial(handle, false);
        }
        tracing::warn!(stream_id = turn.stream_id, error = %error, "Answer failed");
        self.add_notice(&turn.session_id, &error.user_message());
    }
}
