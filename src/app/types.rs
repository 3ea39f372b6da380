//! Types describing what the input line is currently used for.

use crate::input::InputBuffer;

/// What the input line is editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Composing a message
    #[default]
    Compose,
    /// Renaming a session; the unsent message is kept aside
    Rename {
        session_id: String,
        draft: InputBuffer,
    },
}

impl InputMode {
    pub fn is_renaming(&self) -> bool {
        matches!(self, InputMode::Rename { .. })
    }
}
