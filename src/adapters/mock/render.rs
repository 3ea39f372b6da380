//! Recording render sink for testing.

use crate::models::Citation;
use crate::state::SessionSummary;
use crate::traits::{PartialHandle, RenderSink};

/// One call received by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    User(String),
    Typing(PartialHandle),
    Partial(PartialHandle, String),
    Settled { handle: PartialHandle, kept: bool },
    Final { text: String, citations: Vec<Citation> },
    Notice(String),
    Sidebar { titles: Vec<String>, active_id: Option<String> },
    Cleared,
}

/// Render sink that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<RenderEvent>,
    next_handle: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final assistant renders, in order
    pub fn finals(&self) -> Vec<(String, Vec<Citation>)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Final { text, citations } => Some((text.clone(), citations.clone())),
                _ => None,
            })
            .collect()
    }

    /// System notices, in order
    pub fn notices(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notice(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Text of the most recent partial render
    pub fn last_partial(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            RenderEvent::Partial(_, text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for RecordingSink {
    fn render_user_message(&mut self, text: &str) {
        self.events.push(RenderEvent::User(text.to_string()));
    }

    fn render_typing(&mut self) -> PartialHandle {
        self.next_handle += 1;
        let handle = PartialHandle(self.next_handle);
        self.events.push(RenderEvent::Typing(handle));
        handle
    }

    fn render_assistant_partial(&mut self, handle: PartialHandle, text: &str) {
        self.events.push(RenderEvent::Partial(handle, text.to_string()));
    }

    fn settle_partial(&mut self, handle: PartialHandle, keep: bool) {
        self.events.push(RenderEvent::Settled { handle, kept: keep });
    }

    fn render_assistant_final(&mut self, text: &str, citations: &[Citation]) {
        self.events.push(RenderEvent::Final {
            text: text.to_string(),
            citations: citations.to_vec(),
        });
    }

    fn render_system_notice(&mut self, text: &str) {
        self.events.push(RenderEvent::Notice(text.to_string()));
    }

    fn render_sidebar(&mut self, sessions: &[SessionSummary], active_id: Option<&str>) {
        self.events.push(RenderEvent::Sidebar {
            titles: sessions.iter().map(|s| s.title.clone()).collect(),
            active_id: active_id.map(str::to_string),
        });
    }

    fn clear_transcript(&mut self) {
        self.events.push(RenderEvent::Cleared);
    }
}
