//! Application state and logic.
//!
//! [`App`] is the top-level controller: it owns the conversation state, the
//! stream controller and the render sink, and is driven by user commands and
//! by [`AppMessage`]s coming back from spawned tasks.

mod actions;
mod messages;
mod stream;
mod types;

pub use messages::AppMessage;
pub use types::InputMode;

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::input::InputBuffer;
use crate::models::Role;
use crate::state::ApplicationState;
use crate::stream::StreamController;
use crate::traits::{ChatTransport, RenderSink};

/// Notice added when the user stops an answer
pub const STOPPED_NOTICE: &str = "Okay, I'll stop here.";
/// Committed instead of an answer that came back empty
pub const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I couldn't generate a response.";

/// Main application state
pub struct App<S: RenderSink> {
    /// Sessions, active pointer, waiting flag, in-flight turn
    pub state: ApplicationState,
    /// Where render events go
    pub sink: S,
    /// The input line
    pub input: InputBuffer,
    pub mode: InputMode,
    /// Flag to track if the app should quit
    pub should_quit: bool,
    /// Last health check result, `None` until one completes
    pub connected: Option<bool>,
    /// Short-lived hint shown in the status line
    pub status_hint: Option<String>,
    transport: Arc<dyn ChatTransport>,
    controller: StreamController,
    session_key: Option<String>,
    /// Sender handed to spawned tasks
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
}

impl<S: RenderSink> App<S> {
    /// Create the app with one fresh session, already rendered.
    pub fn new(transport: Arc<dyn ChatTransport>, sink: S, config: &ClientConfig) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            state: ApplicationState::new(),
            sink,
            input: InputBuffer::new(),
            mode: InputMode::Compose,
            should_quit: false,
            connected: None,
            status_hint: None,
            transport,
            controller: StreamController::new(),
            session_key: config.session_id.clone(),
            message_tx,
            message_rx: Some(message_rx),
        };
        app.state.create_session();
        app.render_active_session();
        app
    }

    /// Whether an answer is being streamed
    pub fn is_streaming(&self) -> bool {
        self.state.waiting
    }

    pub fn controller(&self) -> &StreamController {
        &self.controller
    }

    /// Spawn a health check whose result arrives as
    /// [`AppMessage::ConnectionStatus`].
    pub fn spawn_health_check(&self) {
        let transport = self.transport.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let healthy = match transport.health().await {
                Ok(healthy) => healthy,
                Err(e) => {
                    tracing::warn!(error = %e, "Health check failed");
                    false
                }
            };
            let _ = tx.send(AppMessage::ConnectionStatus(healthy));
        });
    }

    /// Apply one message from a spawned task.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Stream(message) => self.handle_stream_message(message),
            AppMessage::ConnectionStatus(connected) => self.connected = Some(connected),
        }
    }

    /// Clear the transcript and replay the active session into it,
    /// including the in-progress bubble when the active session is the one
    /// being streamed into.
    pub(crate) fn render_active_session(&mut self) {
        self.sink.clear_transcript();

        if let Some(session) = self.state.active() {
            for message in session.messages() {
                match message.role {
                    Role::User => self.sink.render_user_message(&message.text),
                    Role::Assistant => self
                        .sink
                        .render_assistant_final(&message.text, message.citations()),
                    Role::System => self.sink.render_system_notice(&message.text),
                }
            }
        }

        let visible = self.state.is_streaming_into_active();
        if let Some(turn) = self.state.streaming.as_mut() {
            turn.handle = if visible {
                let handle = self.sink.render_typing();
                if !turn.text.is_empty() {
                    self.sink.render_assistant_partial(handle, &turn.text);
                }
                Some(handle)
            } else {
                None
            };
        }

        self.render_sidebar();
    }

    pub(crate) fn render_sidebar(&mut self) {
        let summaries = self.state.summaries();
        self.sink
            .render_sidebar(&summaries, self.state.active_id());
    }
}
