//! Color theme constants for the chat UI.

use ratatui::style::Color;

/// Panel borders
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Highlights: active session, focused input
pub const COLOR_ACCENT: Color = Color::White;

/// User message prefix
pub const COLOR_USER: Color = Color::LightCyan;

/// Assistant message prefix
pub const COLOR_ASSISTANT: Color = Color::LightGreen;

/// System notices
pub const COLOR_NOTICE: Color = Color::Yellow;

/// Secondary text: sources, hints, typing indicator
pub const COLOR_DIM: Color = Color::DarkGray;

/// Connection lost
pub const COLOR_ERROR: Color = Color::Red;
