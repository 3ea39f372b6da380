//! Lifecycle of one streaming request.

use std::fmt;

/// Where a stream is in its life.
///
/// `Idle -> Streaming -> {Completed | Cancelled | Failed}`. Exactly one exit
/// from `Streaming` is accepted; a terminal phase may only be left by
/// starting the next stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPhase {
    #[default]
    Idle,
    Streaming,
    Completed,
    Cancelled,
    Failed,
}

impl StreamPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StreamPhase::Completed | StreamPhase::Cancelled | StreamPhase::Failed
        )
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: StreamPhase) -> bool {
        match (self, next) {
            (StreamPhase::Streaming, next) => next.is_terminal(),
            (current, StreamPhase::Streaming) => current == StreamPhase::Idle || current.is_terminal(),
            _ => false,
        }
    }

    /// Apply a transition, returning `false` (and leaving the phase alone)
    /// when it is not legal.
    pub fn transition(&mut self, next: StreamPhase) -> bool {
        if !self.can_transition_to(next) {
            tracing::debug!(from = %self, to = %next, "Ignoring illegal stream phase transition");
            return false;
        }
        *self = next;
        true
    }
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamPhase::Idle => "idle",
            StreamPhase::Streaming => "streaming",
            StreamPhase::Completed => "completed",
            StreamPhase::Cancelled => "cancelled",
            StreamPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
