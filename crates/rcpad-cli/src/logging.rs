//! Tracing subscriber setup.
//!
//! The drive session owns the terminal, so logs only go to a file and only
//! when `--log-file` is given. `RCPAD_LOG` takes an `EnvFilter` directive.

use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RCPAD_LOG";
const DEFAULT_FILTER: &str = "info";

pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .into_diagnostic()?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| miette::miette!("failed to install log subscriber: {err}"))
}
