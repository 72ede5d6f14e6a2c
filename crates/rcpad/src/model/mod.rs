pub mod command;
pub mod key;

pub use command::{Command, REPLAY_SYMBOLS};
pub use key::{Key, KeyAction, KeyBinding, KEY_BINDINGS};
