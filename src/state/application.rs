//! Process-wide conversation state.

use uuid::Uuid;

use super::conversation::{ChatSession, SessionSummary};
use crate::models::Citation;
use crate::traits::PartialHandle;

/// Prefix of every generated session id
pub const SESSION_ID_PREFIX: &str = "c_";
const SESSION_ID_RANDOM_CHARS: usize = 8;

/// The assistant turn currently being streamed.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingTurn {
    pub stream_id: u64,
    /// Session the answer will be committed to
    pub session_id: String,
    /// On-screen bubble, absent while another session is displayed
    pub handle: Option<PartialHandle>,
    pub text: String,
    /// Citations received so far, held until the answer is committed
    pub citations: Vec<Citation>,
}

impl StreamingTurn {
    pub fn new(stream_id: u64, session_id: impl Into<String>, handle: Option<PartialHandle>) -> Self {
        Self {
            stream_id,
            session_id: session_id.into(),
            handle,
            text: String::new(),
            citations: Vec::new(),
        }
    }
}

/// All sessions, newest first, plus the active pointer and the
/// single-flight flag.
#[derive(Debug, Default)]
pub struct ApplicationState {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    /// Set while a response is outstanding; gates submission
    pub waiting: bool,
    pub streaming: Option<StreamingTurn>,
}

impl ApplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with the welcome line, put it first and make
    /// it active. Returns its id.
    pub fn create_session(&mut self) -> String {
        let id = self.generate_session_id();
        self.sessions.insert(0, ChatSession::with_welcome(id.clone()));
        self.active_id = Some(id.clone());
        tracing::debug!(session_id = %id, "Created session");
        id
    }

    /// Make `id` the active session. Returns `false` for an unknown id.
    pub fn switch_to(&mut self, id: &str) -> bool {
        if self.session(id).is_none() {
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    /// Whether "new chat" should actually create a session: there is no
    /// active session, or the active one has been used.
    pub fn needs_new_session(&self) -> bool {
        self.active().map_or(true, ChatSession::has_user_message)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&ChatSession> {
        self.active_id.as_deref().and_then(|id| self.session(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.active_id.clone()?;
        self.session_mut(&id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id.as_deref() == Some(id)
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn session_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(ChatSession::summary).collect()
    }

    /// Id of the session `offset` places away from the active one in list
    /// order, clamped to the ends of the list.
    pub fn neighbour_id(&self, offset: isize) -> Option<String> {
        if self.sessions.is_empty() {
            return None;
        }
        let current = self
            .active_id
            .as_deref()
            .and_then(|id| self.sessions.iter().position(|s| s.id() == id))
            .unwrap_or(0);
        let last = self.sessions.len() as isize - 1;
        let target = (current as isize + offset).clamp(0, last) as usize;
        Some(self.sessions[target].id().to_string())
    }

    /// Whether the active session is the one being streamed into
    pub fn is_streaming_into_active(&self) -> bool {
        match (&self.streaming, self.active_id.as_deref()) {
            (Some(turn), Some(active)) => turn.session_id == active,
            _ => false,
        }
    }

    fn generate_session_id(&self) -> String {
        loop {
            let random = Uuid::new_v4().simple().to_string();
            let id = format!("{}{}", SESSION_ID_PREFIX, &random[..SESSION_ID_RANDOM_CHARS]);
            if self.session(&id).is_none() {
                return id;
            }
        }
    }
}
