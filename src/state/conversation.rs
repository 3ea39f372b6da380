//! A single chat session: display log, history log, title.

use serde::Serialize;

use crate::models::{Citation, DisplayMessage, HistoryMessage, Role};

/// Title of a session that has not been named yet
pub const DEFAULT_TITLE: &str = "New chat";
/// Title used when a name would otherwise be blank
pub const FALLBACK_TITLE: &str = "Chat";
/// Seeded assistant line of every new session
pub const WELCOME_MESSAGE: &str = "Welcome! How can I help you.";
/// Characters of the first message used as an automatic title
pub const AUTO_TITLE_CHARS: usize = 28;
/// Longest title a rename may set
pub const MAX_TITLE_CHARS: usize = 60;

/// Sidebar entry for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
}

/// One independent conversation.
///
/// Both logs are append-only. Every user or assistant message appended to
/// `messages` is mirrored, without citations, into `history` in the same
/// call; system notices are display-only.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    title: String,
    messages: Vec<DisplayMessage>,
    history: Vec<HistoryMessage>,
}

impl ChatSession {
    /// An empty session with the default title
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            history: Vec::new(),
        }
    }

    /// A session seeded with the welcome line
    pub fn with_welcome(id: impl Into<String>) -> Self {
        let mut session = Self::new(id);
        session.messages.push(DisplayMessage::greeting(WELCOME_MESSAGE));
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn history(&self) -> &[HistoryMessage] {
        &self.history
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }

    /// Append a user message and its history mirror. The first message of
    /// an unnamed session also names it.
    pub fn append_user_turn(&mut self, text: &str) {
        if self.title == DEFAULT_TITLE {
            self.title = auto_title(text);
        }
        self.push_mirrored(DisplayMessage::user(text));
    }

    /// Append an assistant answer with its citations; the history mirror
    /// carries the text only.
    pub fn append_assistant_turn(&mut self, text: &str, citations: Vec<Citation>) {
        self.push_mirrored(DisplayMessage::assistant(text, citations));
    }

    /// Append a display-only system notice
    pub fn append_system_notice(&mut self, text: &str) {
        self.messages.push(DisplayMessage::system(text));
    }

    /// Rename the session. Trimmed, capped at [`MAX_TITLE_CHARS`], and
    /// [`FALLBACK_TITLE`] when blank.
    pub fn rename(&mut self, new_title: &str) {
        let trimmed = new_title.trim();
        self.title = if trimmed.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            trimmed.chars().take(MAX_TITLE_CHARS).collect()
        };
    }

    /// Whether the session holds a non-blank user message
    pub fn has_user_message(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.role == Role::User && !m.text.trim().is_empty())
    }

    /// Check that `history` mirrors the conversational part of `messages`.
    pub fn history_is_consistent(&self) -> bool {
        let mirrored: Vec<HistoryMessage> =
            self.messages.iter().filter_map(DisplayMessage::to_history).collect();
        mirrored == self.history
    }

    fn push_mirrored(&mut self, message: DisplayMessage) {
        if let Some(entry) = message.to_history() {
            self.history.push(entry);
        }
        self.messages.push(message);
    }
}

fn auto_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return FALLBACK_TITLE.to_string();
    }
    trimmed.chars().take(AUTO_TITLE_CHARS).collect()
}
