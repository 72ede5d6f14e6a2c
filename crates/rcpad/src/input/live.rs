use crate::controller::{DispatchSource, Shared};
use crate::input::KeySource;
use crate::model::{Command, KeyAction};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polling cadence of the live input loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveTiming {
    /// Bounded wait for one key.
    pub poll_interval: Duration,
    /// Pause after every iteration.
    pub yield_interval: Duration,
}

/// Poll keys until the controller stops running.
///
/// A poll that times out is handled like an unmapped key, so the handler
/// receives [`Command::None`] roughly once per poll interval while nothing is
/// pressed and no replay is in control.
pub(crate) fn run_live_loop(shared: &Shared, keys: &mut dyn KeySource, timing: LiveTiming) {
    debug!("live input loop started");
    while shared.is_running() {
        let key = match keys.poll_key(timing.poll_interval) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "key poll failed");
                thread::sleep(timing.poll_interval);
                continue;
            }
        };
        if !shared.is_running() {
            break;
        }
        match key.map_or(KeyAction::Unmapped, KeyAction::from_key) {
            KeyAction::Dispatch(command) => {
                shared.trigger.release();
                shared.dispatch(command, DispatchSource::Live);
            }
            KeyAction::ArmReplay => {
                if shared.trigger.arm() {
                    info!("replay armed");
                } else {
                    debug!("replay already in progress, arm ignored");
                }
            }
            KeyAction::Unmapped => {
                if !shared.trigger.is_suppressed() {
                    shared.dispatch(Command::None, DispatchSource::Live);
                }
            }
        }
        thread::sleep(timing.yield_interval);
    }
    debug!("live input loop stopped");
}
