//! Error types for controller construction and configuration.
//!
//! Every failure carries an [`ErrorCode`] with a stable string form and a
//! process exit code, so the CLI can report errors consistently.

use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Stable error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The controller was built without an input handler.
    MissingHandler,
    /// Configuration could not be read, parsed, or validated.
    Config,
    /// The replay file could not be opened or read.
    ReplayFile,
    /// The terminal could not be prepared or restored.
    Terminal,
    /// A background task could not be started or ended abnormally.
    Task,
}

impl ErrorCode {
    /// String form, e.g. `E_REPLAY_FILE`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingHandler => "E_MISSING_HANDLER",
            Self::Config => "E_CONFIG",
            Self::ReplayFile => "E_REPLAY_FILE",
            Self::Terminal => "E_TERMINAL",
            Self::Task => "E_TASK",
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::MissingHandler | Self::Config => 2,
            Self::ReplayFile => 3,
            Self::Terminal => 4,
            Self::Task => 5,
        }
    }
}

/// Errors surfaced by [`crate::controller::ControllerBuilder::build`],
/// [`crate::controller::Controller::shutdown`] and configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ControllerError {
    #[error("no input handler was provided")]
    #[diagnostic(
        code(rcpad::missing_handler),
        help("call ControllerBuilder::handler before build")
    )]
    MissingHandler,

    #[error("failed to open replay file {}", path.display())]
    #[diagnostic(
        code(rcpad::replay_file),
        help("create the file, point --replay-file elsewhere, or run with --no-replay")
    )]
    ReplayFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal {action} failed")]
    #[diagnostic(code(rcpad::terminal))]
    Terminal {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to start the {task} task")]
    #[diagnostic(code(rcpad::task))]
    TaskSpawn {
        task: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("the {task} task panicked")]
    #[diagnostic(code(rcpad::task))]
    TaskPanicked { task: &'static str },

    #[error("failed to read config {}", path.display())]
    #[diagnostic(code(rcpad::config))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    #[diagnostic(code(rcpad::config))]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    #[diagnostic(code(rcpad::config))]
    ConfigInvalid(String),
}

impl ControllerError {
    pub(crate) fn terminal(action: &'static str, source: io::Error) -> Self {
        Self::Terminal { action, source }
    }

    /// Classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingHandler => ErrorCode::MissingHandler,
            Self::ReplayFile { .. } => ErrorCode::ReplayFile,
            Self::Terminal { .. } => ErrorCode::Terminal,
            Self::TaskSpawn { .. } | Self::TaskPanicked { .. } => ErrorCode::Task,
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid(_) => {
                ErrorCode::Config
            }
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }
}
