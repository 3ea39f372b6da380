//! User-initiated actions: send, stop, new chat, switch, rename.

use crate::error::{StreamError, GENERIC_FAILURE_NOTICE};
use crate::input::{Command, InputBuffer};
use crate::models::ChatRequest;
use crate::state::StreamingTurn;
use crate::traits::RenderSink;

use super::{App, InputMode, STOPPED_NOTICE};

impl<S: RenderSink> App<S> {
    /// Send `text` as a user turn of the active session and start streaming
    /// the answer.
    ///
    /// Returns `false` when nothing was sent: blank text, or an answer is
    /// still outstanding.
    pub fn submit_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        if self.state.waiting {
            self.status_hint = Some(StreamError::AlreadyStreaming.user_message());
            return false;
        }

        if self.state.active().is_none() {
            self.state.create_session();
            self.render_active_session();
        }
        let session_key = self.session_key.clone();
        let Some(session) = self.state.active_mut() else {
            return false;
        };

        session.append_user_turn(text);
        let session_id = session.id().to_string();
        let request = ChatRequest::new(text)
            .with_history(session.history().to_vec())
            .with_session_id(session_key);

        self.status_hint = None;
        self.sink.render_user_message(text);
        self.render_sidebar();

        self.state.waiting = true;
        let handle = self.sink.render_typing();

        match self
            .controller
            .start(self.transport.clone(), request, self.message_tx.clone())
        {
            Ok(stream_id) => {
                self.state.streaming = Some(StreamingTurn::new(stream_id, session_id, Some(handle)));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not start stream");
                self.sink.settle_partial(handle, false);
                self.state.waiting = false;
                self.add_notice(&session_id, GENERIC_FAILURE_NOTICE);
                false
            }
        }
    }

    /// Stop the streaming answer.
    ///
    /// Partial text stays on screen when there is any, but is not committed;
    /// the session gains a "stopped" notice instead. Returns `false` when
    /// nothing was streaming.
    pub fn stop(&mut self) -> bool {
        let Some(turn) = self.state.streaming.take() else {
            return false;
        };
        self.controller.cancel();
        self.state.waiting = false;

        if let Some(handle) = turn.handle {
            self.sink.settle_partial(handle, !turn.text.trim().is_empty());
        }
        tracing::info!(stream_id = turn.stream_id, "Stopped by user");
        self.add_notice(&turn.session_id, STOPPED_NOTICE);
        true
    }

    /// Start a new chat. Stops any streaming answer first; creates a session
    /// only if the active one has been used.
    pub fn new_chat(&mut self) {
        if self.state.waiting {
            self.stop();
        }
        if self.state.needs_new_session() {
            self.state.create_session();
            self.render_active_session();
        }
        self.input.take();
        self.mode = InputMode::Compose;
    }

    /// Make `id` the active session and re-render it. A streaming answer
    /// keeps running and still lands in the session it was started from.
    pub fn switch_to(&mut self, id: &str) -> bool {
        if self.state.is_active(id) {
            return true;
        }
        if !self.state.switch_to(id) {
            return false;
        }
        self.render_active_session();
        true
    }

    /// Rename session `id`.
    pub fn rename_session(&mut self, id: &str, title: &str) -> bool {
        let Some(session) = self.state.session_mut(id) else {
            return false;
        };
        session.rename(title);
        self.render_sidebar();
        true
    }

    /// Apply one keyboard command.
    pub fn handle_command(&mut self, command: Command) {
        if command.is_editing() {
            self.edit_input(command);
            return;
        }

        match command {
            Command::Quit => self.should_quit = true,
            Command::Submit => self.submit_input(),
            Command::Cancel => {
                if self.mode.is_renaming() {
                    self.leave_rename(false);
                } else {
                    self.stop();
                }
            }
            Command::NewChat => self.new_chat(),
            Command::PreviousSession => self.switch_relative(-1),
            Command::NextSession => self.switch_relative(1),
            Command::StartRename => self.enter_rename(),
            // Transcript commands are handled by the view
            Command::ToggleSources | Command::ScrollUp | Command::ScrollDown => {}
            _ => {}
        }
    }

    /// Insert pasted text into the input line
    pub fn paste(&mut self, text: &str) {
        self.input.insert_str(text);
    }

    fn submit_input(&mut self) {
        if self.mode.is_renaming() {
            self.leave_rename(true);
            return;
        }
        if self.state.waiting {
            self.status_hint = Some(StreamError::AlreadyStreaming.user_message());
            return;
        }
        let text = self.input.take();
        self.submit_message(&text);
    }

    fn edit_input(&mut self, command: Command) {
        match command {
            Command::InsertChar(c) => self.input.insert(c),
            Command::Backspace => self.input.backspace(),
            Command::Delete => self.input.delete(),
            Command::CursorLeft => self.input.move_left(),
            Command::CursorRight => self.input.move_right(),
            Command::CursorHome => self.input.move_home(),
            Command::CursorEnd => self.input.move_end(),
            _ => {}
        }
    }

    fn switch_relative(&mut self, offset: isize) {
        if self.mode.is_renaming() {
            return;
        }
        if let Some(id) = self.state.neighbour_id(offset) {
            self.switch_to(&id);
        }
    }

    fn enter_rename(&mut self) {
        if self.mode.is_renaming() {
            return;
        }
        let Some(session) = self.state.active() else {
            return;
        };
        let session_id = session.id().to_string();
        let current = InputBuffer::with_text(session.title());
        let draft = std::mem::replace(&mut self.input, current);
        self.mode = InputMode::Rename { session_id, draft };
    }

    fn leave_rename(&mut self, save: bool) {
        let InputMode::Rename { session_id, draft } = std::mem::take(&mut self.mode) else {
            return;
        };
        let title = std::mem::replace(&mut self.input, draft);
        if save {
            self.rename_session(&session_id, title.as_str());
        }
    }

    /// Append a system notice to `session_id`, rendering it when that
    /// session is on screen.
    pub(crate) fn add_notice(&mut self, session_id: &str, text: &str) {
        if let Some(session) = self.state.session_mut(session_id) {
            session.append_system_notice(text);
        }
        if self.state.is_active(session_id) {
            self.sink.render_system_notice(text);
        }
    }
}
