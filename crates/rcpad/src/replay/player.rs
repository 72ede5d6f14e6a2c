//! Replay task: waits for the trigger, then plays the loaded sequence.

use crate::controller::{DispatchSource, Shared};
use crate::model::Command;
use crate::replay::ReplaySequence;
use crate::trigger::Trigger;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Per-element timing for a replay cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayTiming {
    /// Pause after each element.
    pub delay: Duration,
    /// Dispatches for an element that is not one-shot.
    pub hold_repeats: u32,
}

/// What one replay cycle did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Elements whose dispatches were issued.
    pub elements: usize,
    /// Total handler invocations.
    pub dispatches: usize,
    /// False when live input or shutdown ended the cycle early.
    pub completed: bool,
}

/// Play `sequence` once. The trigger must already be draining; the cycle
/// stops before the next element as soon as suppression is released or the
/// trigger is stopped. Already dispatched commands are not undone.
pub fn play_sequence<F>(
    sequence: &ReplaySequence,
    trigger: &Trigger,
    timing: ReplayTiming,
    mut dispatch: F,
) -> ReplayOutcome
where
    F: FnMut(Command),
{
    let mut outcome = ReplayOutcome::default();
    for command in sequence.iter() {
        if trigger.is_stopped() || !trigger.is_suppressed() {
            return outcome;
        }
        let repeats = if command.is_one_shot() {
            1
        } else {
            timing.hold_repeats
        };
        for _ in 0..repeats {
            dispatch(command);
            outcome.dispatches += 1;
        }
        outcome.elements += 1;
        if !trigger.pause(timing.delay) {
            return outcome;
        }
    }
    outcome.completed = true;
    outcome
}

pub(crate) fn run_replay_loop(
    shared: &Shared,
    sequence: Option<&ReplaySequence>,
    timing: ReplayTiming,
) {
    debug!("replay loop started");
    while shared.trigger.wait_for_arm() {
        let _cycle = CycleGuard(&shared.trigger);
        match sequence {
            Some(sequence) => {
                info!(sequence = %sequence, "replay started");
                let outcome = play_sequence(sequence, &shared.trigger, timing, |command| {
                    shared.dispatch(command, DispatchSource::Replay);
                });
                info!(
                    elements = outcome.elements,
                    dispatches = outcome.dispatches,
                    completed = outcome.completed,
                    "replay finished"
                );
            }
            None => warn!("replay requested but no replay sequence is loaded"),
        }
    }
    debug!("replay loop stopped");
}

/// Ends the current replay cycle when dropped. If the handler panicked, the
/// replay task is gone, so the trigger is also stopped: live input gets its
/// heartbeat back and later arm requests are ignored.
struct CycleGuard<'a>(&'a Trigger);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
        if thread::panicking() {
            error!("input handler panicked during replay, replay disabled");
            self.0.stop();
        }
    }
}
