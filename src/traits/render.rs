//! Render layer contract.
//!
//! The application core reports what happened to the conversation; a
//! [`RenderSink`] decides how that looks. The core never reads anything back
//! from the sink besides the handle of an in-progress bubble.

use crate::models::Citation;
use crate::state::SessionSummary;

/// Identifies one in-progress assistant bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialHandle(pub u64);

/// Receives render events from the application core.
pub trait RenderSink {
    /// Show a user message
    fn render_user_message(&mut self, text: &str);

    /// Show the typing indicator and return the bubble it occupies.
    fn render_typing(&mut self) -> PartialHandle;

    /// Replace the contents of an in-progress bubble with `text`.
    fn render_assistant_partial(&mut self, handle: PartialHandle, text: &str);

    /// Finish with an in-progress bubble. With `keep` the current text stays
    /// on screen as informational content; otherwise the bubble is removed.
    fn settle_partial(&mut self, handle: PartialHandle, keep: bool);

    /// Show a committed assistant answer
    fn render_assistant_final(&mut self, text: &str, citations: &[Citation]);

    /// Show a system notice ("stopped", failures)
    fn render_system_notice(&mut self, text: &str);

    /// Show the session list with `active_id` highlighted
    fn render_sidebar(&mut self, sessions: &[SessionSummary], active_id: Option<&str>);

    /// Drop everything from the transcript before a full re-render.
    fn clear_transcript(&mut self);
}
