//! rcpad: a terminal keyboard controller for remote-controlled vehicles.
//!
//! This crate turns keystrokes into a small vocabulary of movement commands and
//! hands them to a caller-supplied handler. A prerecorded command sequence,
//! loaded once from a text file, can be armed from the keyboard and played back
//! with fixed timing while live input dispatch is suppressed.
//!
//! The entry point is [`controller::Controller`], created through
//! [`controller::ControllerBuilder`].

#![forbid(unsafe_code)]
// Library documentation is in progress. Public API types have docs;
// internal types will be documented in future releases.
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod model;
pub mod render;
pub mod replay;
pub mod trigger;

pub use crate::config::ControllerConfig;
pub use crate::controller::{Context, Controller, ControllerBuilder, InputHandler};
pub use crate::error::{ControllerError, ControllerResult, ErrorCode};
pub use crate::model::{Command, Key, KeyAction};
pub use crate::replay::ReplaySequence;
pub use crate::trigger::TriggerPhase;
