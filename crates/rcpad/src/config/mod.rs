//! Controller configuration and config-file loading.
//!
//! Defaults reproduce the timing of the classic keyboard controller: a 100 ms
//! key poll, a 10 µs yield between polls, and replay elements held for 30
//! dispatches with two seconds between elements.

use crate::error::{ControllerError, ControllerResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Replay file looked up when no other path is configured.
pub const DEFAULT_REPLAY_FILE: &str = "movements.txt";
/// Default bounded wait for one key poll.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
/// Longest accepted key poll. Shutdown waits for the poll in progress, so
/// this also bounds teardown latency.
pub const MAX_POLL_INTERVAL_MS: u64 = 5_000;
/// Default pause after each live loop iteration.
pub const DEFAULT_YIELD_INTERVAL_US: u64 = 10;
/// Default pause between replay elements.
pub const DEFAULT_REPLAY_DELAY_MS: u64 = 2000;
/// Default number of dispatches for a held replay element.
pub const DEFAULT_HOLD_REPEATS: u32 = 30;

/// Tunables for a [`crate::controller::Controller`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Replay file loaded once at construction. `None` disables replay.
    pub replay_file: Option<PathBuf>,
    /// Fail construction when the replay file cannot be opened instead of
    /// running with replay disabled.
    pub replay_required: bool,
    /// Bounded wait for one key poll, in milliseconds.
    pub poll_interval_ms: u64,
    /// Pause after each live loop iteration, in microseconds.
    pub yield_interval_us: u64,
    /// Pause after each replay element, in milliseconds.
    pub replay_delay_ms: u64,
    /// Dispatches per held replay element.
    pub hold_repeats: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            replay_file: Some(PathBuf::from(DEFAULT_REPLAY_FILE)),
            replay_required: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            yield_interval_us: DEFAULT_YIELD_INTERVAL_US,
            replay_delay_ms: DEFAULT_REPLAY_DELAY_MS,
            hold_repeats: DEFAULT_HOLD_REPEATS,
        }
    }
}

impl ControllerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn yield_interval(&self) -> Duration {
        Duration::from_micros(self.yield_interval_us)
    }

    pub fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.replay_delay_ms)
    }

    /// Reject settings the loops cannot run with.
    pub fn validate(&self) -> ControllerResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ControllerError::ConfigInvalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ControllerError::ConfigInvalid(format!(
                "poll_interval_ms must be at most {MAX_POLL_INTERVAL_MS}"
            )));
        }
        if self.hold_repeats == 0 {
            return Err(ControllerError::ConfigInvalid(
                "hold_repeats must be greater than zero".to_string(),
            ));
        }
        if self.replay_required && self.replay_file.is_none() {
            return Err(ControllerError::ConfigInvalid(
                "replay_required is set but no replay_file is configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a config file. Files ending in `.yaml` or `.yml` are parsed as YAML,
/// everything else as JSON. The result is validated before it is returned.
pub fn load_config_file(path: &Path) -> ControllerResult<ControllerConfig> {
    let data = fs::read_to_string(path).map_err(|source| ControllerError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| ControllerError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let config: ControllerConfig = if is_yaml {
        serde_yml::from_str(&data).map_err(|err| parse_error(err.to_string()))?
    } else {
        serde_json::from_str(&data).map_err(|err| parse_error(err.to_string()))?
    };
    config.validate()?;
    Ok(config)
}
