//! Conversation state
//!
//! - `conversation`: one chat session with its display and history logs
//! - `application`: the session list, the active pointer, the in-flight turn

mod application;
mod conversation;

pub use application::{ApplicationState, StreamingTurn, SESSION_ID_PREFIX};
pub use conversation::{
    ChatSession, SessionSummary, AUTO_TITLE_CHARS, DEFAULT_TITLE, FALLBACK_TITLE, MAX_TITLE_CHARS,
    WELCOME_MESSAGE,
};
