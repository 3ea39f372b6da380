//! Assistant text formatting and wrapping.
//!
//! Answers are plain text with light list structure: `-`/`•` lines are
//! bullets, `N.` lines are numbered items (renumbered from 1 within each
//! run), blank lines are dropped, everything else is a paragraph.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-•]\s+").expect("Invalid bullet regex pattern"));
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s+").expect("Invalid numbered item regex pattern"));

/// One formatted line of an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedLine {
    Paragraph(String),
    Bullet(String),
    /// Position within its list, starting at 1
    Numbered(usize, String),
}

impl FormattedLine {
    /// Marker drawn before the text
    pub fn marker(&self) -> String {
        match self {
            FormattedLine::Paragraph(_) => String::new(),
            FormattedLine::Bullet(_) => "• ".to_string(),
            FormattedLine::Numbered(n, _) => format!("{}. ", n),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            FormattedLine::Paragraph(t) | FormattedLine::Bullet(t) | FormattedLine::Numbered(_, t) => t,
        }
    }
}

/// Split assistant text into formatted lines.
pub fn format_assistant_text(text: &str) -> Vec<FormattedLine> {
    let mut out = Vec::new();
    let mut number = 0;

    for raw in text.split('\n') {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            number = 0;
            continue;
        }

        if let Some(m) = BULLET_RE.find(line) {
            number = 0;
            out.push(FormattedLine::Bullet(line[m.end()..].to_string()));
        } else if let Some(m) = NUMBERED_RE.find(line) {
            number += 1;
            out.push(FormattedLine::Numbered(number, line[m.end()..].to_string()));
        } else {
            number = 0;
            out.push(FormattedLine::Paragraph(line.to_string()));
        }
    }

    out
}

/// Word-wrap `text` to `width` display columns. Words wider than a line are
/// broken at character boundaries. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }
        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for c in word.chars() {
            let c_width = c.width().unwrap_or(1);
            if current_width + c_width > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += c_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
