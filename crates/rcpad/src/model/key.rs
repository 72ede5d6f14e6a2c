use crate::model::Command;
use crossterm::event::KeyCode;
use serde::Serialize;

/// A key as seen by the live input loop, independent of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape.
    Esc,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// A printable character (space included).
    Char(char),
    /// Anything else the terminal reported.
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Esc => Self::Esc,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Char(ch) => Self::Char(ch),
            _ => Self::Other,
        }
    }
}

/// What the live input loop does with a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Release replay suppression and dispatch the command.
    Dispatch(Command),
    /// Arm the replay sequence; nothing is dispatched.
    ArmReplay,
    /// Dispatch [`Command::None`] unless a replay is in control.
    Unmapped,
}

impl KeyAction {
    /// Map a key through the live key bindings.
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Esc | Key::Char('q') => Self::Dispatch(Command::Exit),
            Key::Up => Self::Dispatch(Command::Forward),
            Key::Down => Self::Dispatch(Command::Back),
            Key::Left => Self::Dispatch(Command::Left),
            Key::Right => Self::Dispatch(Command::Right),
            Key::Char(' ') => Self::Dispatch(Command::Jump),
            Key::Char('r' | 'R') => Self::ArmReplay,
            Key::Char(_) | Key::Other => Self::Unmapped,
        }
    }
}

/// Human-readable description of one live key binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KeyBinding {
    /// Key label as shown to the user.
    pub key: &'static str,
    /// What pressing the key does.
    pub action: &'static str,
}

/// Live key bindings, in display order.
pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding { key: "up", action: "forward" },
    KeyBinding { key: "down", action: "back" },
    KeyBinding { key: "left", action: "left" },
    KeyBinding { key: "right", action: "right" },
    KeyBinding { key: "space", action: "jump" },
    KeyBinding { key: "r / R", action: "play the replay sequence" },
    KeyBinding { key: "q / esc", action: "exit" },
];
