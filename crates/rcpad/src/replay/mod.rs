//! Prerecorded command sequences.
//!
//! A replay file is plain text read byte by byte. The symbols `f b l r j q`
//! map to forward, back, left, right, jump and exit; every other byte,
//! newlines included, is skipped. At most [`REPLAY_CAPACITY`] commands are
//! collected and reading stops as soon as the sequence is full.
//!
//! [`player`] holds the task that plays a loaded sequence once armed.

pub mod player;

pub use player::{play_sequence, ReplayOutcome, ReplayTiming};

use crate::error::{ControllerError, ControllerResult};
use crate::model::Command;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Maximum number of commands in a replay sequence.
pub const REPLAY_CAPACITY: usize = 20;

/// Ordered, bounded, read-only list of replay commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySequence {
    commands: Vec<Command>,
}

impl ReplaySequence {
    /// Read a sequence from any byte source.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut commands = Vec::with_capacity(REPLAY_CAPACITY);
        for byte in reader.bytes() {
            if let Some(command) = Command::from_symbol(byte?) {
                commands.push(command);
                if commands.len() == REPLAY_CAPACITY {
                    break;
                }
            }
        }
        Ok(Self { commands })
    }

    /// Parse a sequence from an in-memory string.
    pub fn parse(text: &str) -> Self {
        Self {
            commands: text
                .bytes()
                .filter_map(Command::from_symbol)
                .take(REPLAY_CAPACITY)
                .collect(),
        }
    }

    /// Open and read a replay file.
    pub fn load(path: &Path) -> ControllerResult<Self> {
        let to_error = |source| ControllerError::ReplayFile {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        Self::from_reader(BufReader::new(file)).map_err(to_error)
    }

    /// Number of commands, at most [`REPLAY_CAPACITY`].
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in playback order.
    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.iter().copied()
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }
}

impl fmt::Display for ReplaySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.commands.iter().filter_map(|command| command.symbol()) {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
