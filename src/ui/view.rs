//! The transcript as the terminal shows it.
//!
//! [`TranscriptView`] is the render sink of the TUI: it keeps a list of
//! entries mirroring what the user sees and turns them into styled lines on
//! every draw.

use std::cell::Cell;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::format::{format_assistant_text, wrap_text};
use super::theme::{COLOR_ASSISTANT, COLOR_DIM, COLOR_NOTICE, COLOR_USER};
use crate::models::Citation;
use crate::state::SessionSummary;
use crate::traits::{PartialHandle, RenderSink};

const USER_PREFIX: &str = "You: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";
const TYPING_TEXT: &str = "...";

/// One item of the transcript
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    User(String),
    /// In-progress answer; empty text shows the typing indicator
    Partial { handle: PartialHandle, text: String },
    /// Partial text left behind by a stopped answer
    Stopped(String),
    Assistant {
        text: String,
        citations: Vec<Citation>,
        sources_open: bool,
    },
    Notice(String),
}

/// Render sink backing the terminal UI.
#[derive(Debug, Default)]
pub struct TranscriptView {
    entries: Vec<TranscriptEntry>,
    sessions: Vec<SessionSummary>,
    active_id: Option<String>,
    next_handle: u64,
    /// Lines scrolled up from the bottom
    scroll_back: usize,
    /// Furthest scroll-back the last draw allowed
    max_back: Cell<usize>,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Expand or collapse the sources of the latest answer that has any.
    /// Returns `false` when no answer has sources.
    pub fn toggle_latest_sources(&mut self) -> bool {
        for entry in self.entries.iter_mut().rev() {
            if let TranscriptEntry::Assistant {
                citations,
                sources_open,
                ..
            } = entry
            {
                if !citations.is_empty() {
                    *sources_open = !*sources_open;
                    return true;
                }
            }
        }
        false
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self
            .scroll_back
            .saturating_add(lines)
            .min(self.max_back.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self
            .scroll_back
            .min(self.max_back.get())
            .saturating_sub(lines);
    }

    /// Record how far the transcript can scroll at the drawn size.
    pub fn set_max_back(&self, max_back: usize) {
        self.max_back.set(max_back);
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Every transcript line wrapped to `width` columns.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            match entry {
                TranscriptEntry::User(text) => {
                    push_prefixed(&mut lines, USER_PREFIX, COLOR_USER, text, width, Style::default());
                }
                TranscriptEntry::Partial { text, .. } if text.is_empty() => {
                    lines.push(Line::from(vec![
                        Span::styled(ASSISTANT_PREFIX, Style::default().fg(COLOR_ASSISTANT)),
                        Span::styled(TYPING_TEXT, Style::default().fg(COLOR_DIM)),
                    ]));
                }
                TranscriptEntry::Partial { text, .. } | TranscriptEntry::Stopped(text) => {
                    push_answer(&mut lines, text, width);
                }
                TranscriptEntry::Assistant {
                    text,
                    citations,
                    sources_open,
                } => {
                    push_answer(&mut lines, text, width);
                    push_sources(&mut lines, citations, *sources_open, width);
                }
                TranscriptEntry::Notice(text) => {
                    let style = Style::default()
                        .fg(COLOR_NOTICE)
                        .add_modifier(Modifier::ITALIC);
                    for row in wrap_text(text, width) {
                        lines.push(Line::from(Span::styled(row, style)));
                    }
                }
            }
            lines.push(Line::default());
        }
        lines
    }

    fn partial_index(&self, handle: PartialHandle) -> Option<usize> {
        self.entries.iter().position(|e| {
            matches!(e, TranscriptEntry::Partial { handle: h, .. } if *h == handle)
        })
    }
}

fn push_prefixed(
    lines: &mut Vec<Line<'static>>,
    prefix: &'static str,
    prefix_color: ratatui::style::Color,
    text: &str,
    width: usize,
    text_style: Style,
) {
    let indent = " ".repeat(prefix.len());
    let rows = wrap_text(text, width.saturating_sub(prefix.len()));
    for (i, row) in rows.into_iter().enumerate() {
        let lead = if i == 0 {
            Span::styled(prefix, Style::default().fg(prefix_color))
        } else {
            Span::raw(indent.clone())
        };
        lines.push(Line::from(vec![lead, Span::styled(row, text_style)]));
    }
}

fn push_answer(lines: &mut Vec<Line<'static>>, text: &str, width: usize) {
    lines.push(Line::from(Span::styled(
        ASSISTANT_PREFIX.trim_end().to_string(),
        Style::default().fg(COLOR_ASSISTANT),
    )));
    for item in format_assistant_text(text) {
        let marker = format!("  {}", item.marker());
        let indent = " ".repeat(marker.chars().count());
        let rows = wrap_text(item.text(), width.saturating_sub(indent.len()));
        for (i, row) in rows.into_iter().enumerate() {
            let lead = if i == 0 { marker.clone() } else { indent.clone() };
            lines.push(Line::from(vec![Span::raw(lead), Span::raw(row)]));
        }
    }
}

fn push_sources(lines: &mut Vec<Line<'static>>, citations: &[Citation], open: bool, width: usize) {
    if citations.is_empty() {
        return;
    }
    let dim = Style::default().fg(COLOR_DIM);
    let arrow = if open { "▾" } else { "▸" };
    lines.push(Line::from(Span::styled(
        format!("  {} Sources ({})", arrow, citations.len()),
        dim,
    )));
    if !open {
        return;
    }
    for citation in citations {
        for (i, row) in wrap_text(&citation.label(), width.saturating_sub(6))
            .into_iter()
            .enumerate()
        {
            let lead = if i == 0 { "    - " } else { "      " };
            lines.push(Line::from(Span::styled(format!("{}{}", lead, row), dim)));
        }
    }
}

impl RenderSink for TranscriptView {
    fn render_user_message(&mut self, text: &str) {
        self.scroll_back = 0;
        self.entries.push(TranscriptEntry::User(text.to_string()));
    }

    fn render_typing(&mut self) -> PartialHandle {
        self.next_handle += 1;
        let handle = PartialHandle(self.next_handle);
        self.entries.push(TranscriptEntry::Partial {
            handle,
            text: String::new(),
        });
        handle
    }

    fn render_assistant_partial(&mut self, handle: PartialHandle, text: &str) {
        if let Some(TranscriptEntry::Partial { text: current, .. }) = self
            .partial_index(handle)
            .and_then(|i| self.entries.get_mut(i))
        {
            *current = text.to_string();
        }
    }

    fn settle_partial(&mut self, handle: PartialHandle, keep: bool) {
        let Some(index) = self.partial_index(handle) else {
            return;
        };
        let entry = self.entries.remove(index);
        if let (true, TranscriptEntry::Partial { text, .. }) = (keep, entry) {
            self.entries.insert(index, TranscriptEntry::Stopped(text));
        }
    }

    fn render_assistant_final(&mut self, text: &str, citations: &[Citation]) {
        self.entries.push(TranscriptEntry::Assistant {
            text: text.to_string(),
            citations: citations.to_vec(),
            sources_open: false,
        });
    }

    fn render_system_notice(&mut self, text: &str) {
        self.entries.push(TranscriptEntry::Notice(text.to_string()));
    }

    fn render_sidebar(&mut self, sessions: &[SessionSummary], active_id: Option<&str>) {
        self.sessions = sessions.to_vec();
        self.active_id = active_id.map(str::to_string);
    }

    fn clear_transcript(&mut self) {
        self.entries.clear();
        self.scroll_back = 0;
    }
}
