//! Keyboard input handling.
//!
//! - [`Command`] - what a key press means
//! - [`KeybindingConfig`] - key to command lookup
//! - [`InputBuffer`] - the editable input line

mod buffer;
mod command;
mod keybindings;

pub use buffer::InputBuffer;
pub use command::Command;
pub use keybindings::{KeyCombo, KeybindingConfig};
