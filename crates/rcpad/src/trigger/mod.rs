//! Shared replay trigger between the live input loop and the replay loop.
//!
//! The live loop is the only task that arms the trigger; the replay loop is
//! the only task that consumes it. The phase lives behind a mutex paired with
//! a condition variable. The suppression indicator and the stop flag are
//! atomics so either loop can read them without taking the lock, but every
//! write that may end a wait is made while holding the lock, so a waiter can
//! never miss the notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Replay trigger phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriggerPhase {
    /// Waiting for the replay key.
    #[default]
    Idle,
    /// The replay key was pressed; the replay loop has not picked it up yet.
    Armed,
    /// The replay loop is playing the sequence.
    Draining,
}

/// Arm/consume handoff plus the suppression indicator and stop signal.
#[derive(Debug, Default)]
pub struct Trigger {
    phase: Mutex<TriggerPhase>,
    signal: Condvar,
    suppressed: AtomicBool,
    stopped: AtomicBool,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TriggerPhase> {
        // The guarded value is a plain enum; a panic elsewhere cannot leave it
        // half-written.
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current phase, read under the lock.
    pub fn phase(&self) -> TriggerPhase {
        *self.lock()
    }

    /// True while a replay has been armed and not yet finished or cancelled.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// True once [`Trigger::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Move `Idle` to `Armed` and wake the replay loop. Returns false, and
    /// changes nothing, when a replay is already armed or draining or the
    /// trigger has been stopped.
    pub fn arm(&self) -> bool {
        let mut phase = self.lock();
        if *phase != TriggerPhase::Idle || self.is_stopped() {
            return false;
        }
        *phase = TriggerPhase::Armed;
        self.suppressed.store(true, Ordering::SeqCst);
        self.signal.notify_all();
        true
    }

    /// Clear the suppression indicator because live input took control.
    /// A replay pausing between elements is woken so it can stop early.
    pub fn release(&self) {
        let _phase = self.lock();
        if self.suppressed.swap(false, Ordering::SeqCst) {
            self.signal.notify_all();
        }
    }

    /// Block until armed, then move to `Draining` and return true. Returns
    /// false once the trigger is stopped.
    pub fn wait_for_arm(&self) -> bool {
        let mut phase = self.lock();
        loop {
            if self.is_stopped() {
                return false;
            }
            if *phase == TriggerPhase::Armed {
                *phase = TriggerPhase::Draining;
                return true;
            }
            phase = self
                .signal
                .wait(phase)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Sleep for `delay` between replay elements. Returns true when the full
    /// delay elapsed with the replay still in control, false when it was cut
    /// short by [`Trigger::release`] or [`Trigger::stop`].
    pub fn pause(&self, delay: Duration) -> bool {
        let deadline = Instant::now() + delay;
        let mut phase = self.lock();
        loop {
            if self.is_stopped() || !self.is_suppressed() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            phase = self
                .signal
                .wait_timeout(phase, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    /// End a replay cycle: back to `Idle` with suppression cleared.
    pub fn finish(&self) {
        let mut phase = self.lock();
        *phase = TriggerPhase::Idle;
        self.suppressed.store(false, Ordering::SeqCst);
        self.signal.notify_all();
    }

    /// Stop the replay loop: wakes a blocked [`Trigger::wait_for_arm`] or
    /// [`Trigger::pause`] and makes every later call return immediately.
    pub fn stop(&self) {
        let _phase = self.lock();
        self.stopped.store(true, Ordering::SeqCst);
        self.suppressed.store(false, Ordering::SeqCst);
        self.signal.notify_all();
    }
}
