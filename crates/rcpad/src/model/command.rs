use serde::{Deserialize, Serialize};
use std::fmt;

/// Replay-file symbols in the order they are documented.
pub const REPLAY_SYMBOLS: &[(u8, Command)] = &[
    (b'f', Command::Forward),
    (b'b', Command::Back),
    (b'l', Command::Left),
    (b'r', Command::Right),
    (b'j', Command::Jump),
    (b'q', Command::Exit),
];

/// Semantic movement command delivered to the vehicle handler.
///
/// `None` is the idle command: it is sent while no mapped key is pressed and
/// lets the receiving side stop any sustained motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Leave the session.
    Exit,
    /// Drive forward.
    Forward,
    /// Drive backward.
    Back,
    /// Turn left.
    Left,
    /// Turn right.
    Right,
    /// Jump.
    Jump,
    /// No movement requested.
    None,
}

impl Command {
    /// Map a replay-file byte to a command. Unrecognized bytes yield `None`
    /// (the Rust option, not [`Command::None`]).
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        REPLAY_SYMBOLS
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, command)| *command)
    }

    /// Replay-file symbol for this command, if it has one.
    pub fn symbol(self) -> Option<char> {
        REPLAY_SYMBOLS
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(symbol, _)| char::from(*symbol))
    }

    /// Commands that are dispatched exactly once during replay instead of
    /// being held for the repeat count.
    pub fn is_one_shot(self) -> bool {
        matches!(self, Self::Exit | Self::Jump)
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Forward => "forward",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
            Self::Jump => "jump",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
