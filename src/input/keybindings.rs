//! Default keybindings for the application.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

use super::command::Command;

/// Represents a key combination (key code + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Creates a key combo with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Creates a key combo with Control modifier.
    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }
}

/// Key to command lookup table.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, Command>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingConfig {
    /// Creates the default bindings.
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(KeyCombo::ctrl(KeyCode::Char('c')), Command::Quit);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('q')), Command::Quit);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('n')), Command::NewChat);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('s')), Command::ToggleSources);
        bindings.insert(KeyCombo::ctrl(KeyCode::Up), Command::PreviousSession);
        bindings.insert(KeyCombo::ctrl(KeyCode::Down), Command::NextSession);
        bindings.insert(KeyCombo::plain(KeyCode::F(2)), Command::StartRename);
        bindings.insert(KeyCombo::plain(KeyCode::Esc), Command::Cancel);
        bindings.insert(KeyCombo::plain(KeyCode::Enter), Command::Submit);
        bindings.insert(KeyCombo::plain(KeyCode::PageUp), Command::ScrollUp);
        bindings.insert(KeyCombo::plain(KeyCode::PageDown), Command::ScrollDown);

        bindings.insert(KeyCombo::plain(KeyCode::Backspace), Command::Backspace);
        bindings.insert(KeyCombo::plain(KeyCode::Delete), Command::Delete);
        bindings.insert(KeyCombo::plain(KeyCode::Left), Command::CursorLeft);
        bindings.insert(KeyCombo::plain(KeyCode::Right), Command::CursorRight);
        bindings.insert(KeyCombo::plain(KeyCode::Home), Command::CursorHome);
        bindings.insert(KeyCombo::plain(KeyCode::End), Command::CursorEnd);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('a')), Command::CursorHome);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('e')), Command::CursorEnd);

        Self { bindings }
    }

    /// Map a key event to a command.
    ///
    /// Release and repeat events are ignored. Printable characters without
    /// Control/Alt insert themselves.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if let Some(command) = self.bindings.get(&KeyCombo::new(key.code, key.modifiers)) {
            return Some(command.clone());
        }

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Command::InsertChar(c))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_global_bindings() {
        let config = KeybindingConfig::new();
        assert_eq!(
            config.resolve(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            config.resolve(&press(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Command::NewChat)
        );
        assert_eq!(
            config.resolve(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Command::Cancel)
        );
        assert_eq!(
            config.resolve(&press(KeyCode::F(2), KeyModifiers::NONE)),
            Some(Command::StartRename)
        );
    }

    #[test]
    fn test_session_switching() {
        let config = KeybindingConfig::new();
        assert_eq!(
            config.resolve(&press(KeyCode::Up, KeyModifiers::CONTROL)),
            Some(Command::PreviousSession)
        );
        assert_eq!(
            config.resolve(&press(KeyCode::Down, KeyModifiers::CONTROL)),
            Some(Command::NextSession)
        );
    }

    #[test]
    fn test_printable_characters_insert() {
        let config = KeybindingConfig::new();
        assert_eq!(
            config.resolve(&press(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Command::InsertChar('x'))
        );
        assert_eq!(
            config.resolve(&press(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(Command::InsertChar('X'))
        );
        assert_eq!(
            config.resolve(&press(KeyCode::Char('x'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let config = KeybindingConfig::new();
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(config.resolve(&release), None);
    }
}
