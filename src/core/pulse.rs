//! Debounced attention pulse.
//!
//! The pulse switches on a fixed delay after the control becomes visible.
//! Every visibility transition invalidates the pending timer first, so
//! bouncing across the threshold never fires a stale pulse and never leaves
//! more than one timer armed.

use std::time::Duration;

use super::scheduler::{Scheduler, Task, TaskHandle};

/// Delay between the control appearing and the pulse starting.
pub const PULSE_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone)]
pub struct PulseScheduler {
    delay: Duration,
    /// The single live timer, if any.
    pending: Option<TaskHandle>,
    active: bool,
}

impl PulseScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            active: false,
        }
    }

    /// React to a visibility flip.  Same-value calls are no-ops.
    pub fn on_visibility_changed(
        &mut self,
        previous: bool,
        next: bool,
        sched: &mut impl Scheduler,
    ) {
        match (previous, next) {
            (false, true) => {
                self.disarm(sched);
                self.active = false;
                let handle = sched.set_timeout(self.delay, Task::Pulse);
                let due = sched.now() + self.delay;
                tracing::debug!(?handle, ?due, "pulse armed");
                self.pending = Some(handle);
            }
            (true, false) => {
                self.disarm(sched);
                self.active = false;
            }
            _ => {}
        }
    }

    /// The timer behind `handle` came due.  Returns `true` if it was the
    /// live one and the pulse is now on.
    pub fn fire(&mut self, handle: TaskHandle) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(?handle, "ignoring stale pulse timer");
            return false;
        }
        self.pending = None;
        self.active = true;
        tracing::debug!("pulse started");
        true
    }

    /// The user acted on the control: stop pulsing.  A pending timer stays
    /// armed; only visibility changes and teardown disarm it.
    pub fn acknowledge(&mut self) {
        self.active = false;
    }

    /// Teardown.
    pub fn cancel(&mut self, sched: &mut impl Scheduler) {
        self.disarm(sched);
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    fn disarm(&mut self, sched: &mut impl Scheduler) {
        if let Some(handle) = self.pending.take() {
            sched.cancel(handle);
            tracing::debug!(?handle, "pulse timer cancelled");
        }
    }
}

impl Default for PulseScheduler {
    fn default() -> Self {
        Self::new(PULSE_DELAY)
    }
}
