//! Command definitions for keyboard input handling.
//!
//! The [`Command`] enum decouples key bindings from their effects.

/// Every user action a key can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // =========================================================================
    // Global Commands
    // =========================================================================
    /// Quit the application (Ctrl+C, Ctrl+Q)
    Quit,
    /// Start a new chat (Ctrl+N)
    NewChat,
    /// Stop the streaming answer, or leave rename mode (Esc)
    Cancel,
    /// Send the input, or save a rename (Enter)
    Submit,

    // =========================================================================
    // Sessions
    // =========================================================================
    /// Switch to the session above in the sidebar (Ctrl+Up)
    PreviousSession,
    /// Switch to the session below in the sidebar (Ctrl+Down)
    NextSession,
    /// Rename the active session (F2)
    StartRename,

    // =========================================================================
    // Transcript
    // =========================================================================
    /// Expand or collapse the sources of the latest answer (Ctrl+S)
    ToggleSources,
    /// Scroll the transcript up (PageUp)
    ScrollUp,
    /// Scroll the transcript down (PageDown)
    ScrollDown,

    // =========================================================================
    // Input editing
    // =========================================================================
    InsertChar(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
}

impl Command {
    /// Whether this command edits the input line.
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::Backspace
                | Command::Delete
                | Command::CursorLeft
                | Command::CursorRight
                | Command::CursorHome
                | Command::CursorEnd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_editing() {
        assert!(Command::InsertChar('a').is_editing());
        assert!(Command::CursorEnd.is_editing());
        assert!(!Command::Submit.is_editing());
        assert!(!Command::Quit.is_editing());
    }
}
