//! Keyboard input sources and the live input loop.
//!
//! The loop only sees the [`KeySource`] trait: a bounded-wait poll that
//! returns at most one key. [`CrosstermKeys`] reads the real terminal; tests
//! substitute scripted sources.

pub mod live;

pub use live::LiveTiming;

use crate::model::Key;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::time::Duration;

/// A source of key presses with a bounded wait.
pub trait KeySource: Send {
    /// Wait at most `timeout` for a key. `Ok(None)` means no key arrived.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

/// Reads key presses from the terminal through crossterm.
///
/// Only press events are reported; releases, repeats, mouse and resize
/// events count as "no key".
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl CrosstermKeys {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Key::from(key.code))),
            _ => Ok(None),
        }
    }
}
