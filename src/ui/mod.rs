//! Terminal rendering for the chat client.
//!
//! Layout:
//! - Left: session list, active session highlighted
//! - Right: transcript, status line, input box

mod format;
mod theme;
mod view;

pub use format::{format_assistant_text, wrap_text, FormattedLine};
pub use theme::{
    COLOR_ACCENT, COLOR_ASSISTANT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_NOTICE, COLOR_USER,
};
pub use view::{TranscriptEntry, TranscriptView};

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, InputMode};

/// Width of the session list
const SIDEBAR_WIDTH: u16 = 28;

const KEY_HINTS: &str =
    "Enter send · Esc stop · Ctrl+N new · Ctrl+↑/↓ switch · F2 rename · Ctrl+S sources · Ctrl+Q quit";

/// Draw the whole UI.
pub fn render(frame: &mut Frame, app: &App<TranscriptView>) {
    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .areas(frame.area());
    let [transcript, status, input] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(main);

    render_sidebar(frame, app, sidebar);
    render_transcript(frame, app, transcript);
    render_status(frame, app, status);
    render_input(frame, app, input);
}

fn render_sidebar(frame: &mut Frame, app: &App<TranscriptView>, area: Rect) {
    let view = &app.sink;
    let streaming_id = app.state.streaming.as_ref().map(|t| t.session_id.as_str());

    let items: Vec<ListItem> = view
        .sessions()
        .iter()
        .map(|session| {
            let active = view.active_id() == Some(session.id.as_str());
            let marker = if active { "▶ " } else { "  " };
            let mut spans = vec![Span::raw(marker), Span::raw(session.title.clone())];
            if streaming_id == Some(session.id.as_str()) {
                spans.push(Span::styled(" …", Style::default().fg(COLOR_DIM)));
            }
            let style = if active {
                Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(COLOR_DIM)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::bordered()
            .title(" Chats ")
            .border_style(Style::default().fg(COLOR_BORDER)),
    );
    frame.render_widget(list, area);
}

fn render_transcript(frame: &mut Frame, app: &App<TranscriptView>, area: Rect) {
    let block = Block::bordered()
        .title(active_title(app))
        .border_style(Style::default().fg(COLOR_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = app.sink.lines(inner.width as usize);
    let height = inner.height as usize;
    let max_back = lines.len().saturating_sub(height);
    app.sink.set_max_back(max_back);
    let back = app.sink.scroll_back().min(max_back);
    let end = lines.len() - back;
    let start = end.saturating_sub(height);

    frame.render_widget(Paragraph::new(lines[start..end].to_vec()), inner);
}

fn active_title(app: &App<TranscriptView>) -> String {
    app.state
        .active()
        .map(|s| format!(" {} ", s.title()))
        .unwrap_or_default()
}

fn render_status(frame: &mut Frame, app: &App<TranscriptView>, area: Rect) {
    let connection = match app.connected {
        Some(true) => Span::styled("● online  ", Style::default().fg(COLOR_ASSISTANT)),
        Some(false) => Span::styled("● offline  ", Style::default().fg(COLOR_ERROR)),
        None => Span::styled("○ checking  ", Style::default().fg(COLOR_DIM)),
    };

    let message = if app.mode.is_renaming() {
        Span::styled("Renaming chat: Enter saves, Esc cancels", Style::default().fg(COLOR_NOTICE))
    } else if let Some(hint) = &app.status_hint {
        Span::styled(hint.clone(), Style::default().fg(COLOR_NOTICE))
    } else if app.is_streaming() {
        Span::styled("Answering… Esc to stop", Style::default().fg(COLOR_DIM))
    } else {
        Span::styled(KEY_HINTS, Style::default().fg(COLOR_DIM))
    };

    frame.render_widget(Paragraph::new(Line::from(vec![connection, message])), area);
}

fn render_input(frame: &mut Frame, app: &App<TranscriptView>, area: Rect) {
    let title = match &app.mode {
        InputMode::Compose => " Message ",
        InputMode::Rename { .. } => " Rename chat ",
    };
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(COLOR_ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (visible, cursor_x) = visible_input(app.input.as_str(), app.input.cursor_column(), inner.width as usize);
    frame.render_widget(Paragraph::new(visible), inner);
    frame.set_cursor_position((inner.x + cursor_x as u16, inner.y));
}

/// The slice of `text` that fits in `width` columns with the cursor in
/// view, and the cursor's column within it.
fn visible_input(text: &str, cursor_column: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let skip = cursor_column.saturating_sub(width - 1);
    let mut skipped = 0;
    let mut visible = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if skipped < skip {
            skipped += w;
            continue;
        }
        if visible.width() + w > width {
            break;
        }
        visible.push(c);
    }
    (visible, cursor_column - skipped.min(cursor_column))
}
