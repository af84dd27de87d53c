//! Deferred work as explicit, cancellable tasks.
//!
//! Timers and animation-frame callbacks are plain values here.  Whoever
//! schedules something gets a [`TaskHandle`] back and is expected to hold
//! at most one live handle per concern, cancelling before it reschedules.
//!
//! [`TaskQueue`] keeps its own virtual clock.  The runtime feeds it the
//! real elapsed time; tests feed it whatever they like.  Due tasks are
//! handed back to the caller instead of being invoked, so the caller stays
//! in charge of routing them (and of refusing them after teardown).

use std::collections::BTreeMap;
use std::time::Duration;

/// Opaque token identifying one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// What a scheduled task should do when it comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Delayed activation of the attention pulse.
    Pulse,
    /// One smooth-scroll frame step.
    ScrollStep,
}

/// Scheduling capability handed to the controller.
pub trait Scheduler {
    /// Current time on the scheduler's clock.
    fn now(&self) -> Duration;

    /// Run `task` once, `delay` from now.
    fn set_timeout(&mut self, delay: Duration, task: Task) -> TaskHandle;

    /// Run `task` on the next animation frame.
    fn request_frame(&mut self, task: Task) -> TaskHandle;

    /// Forget a pending task.  Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);
}

/// Virtual-time timer wheel plus a single-frame callback list.
#[derive(Debug, Default)]
pub struct TaskQueue {
    now: Duration,
    next_id: u64,
    /// Ordered by deadline, ties broken by scheduling order.
    timers: BTreeMap<(Duration, TaskHandle), Task>,
    /// Callbacks waiting for the next frame.
    frames: Vec<(TaskHandle, Task)>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and return every timer whose deadline has
    /// passed, earliest first.  The clock never runs backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<(TaskHandle, Task)> {
        self.now = self.now.max(now);
        let later = self.timers.split_off(&(self.now + Duration::from_nanos(1), TaskHandle(0)));
        let due = std::mem::replace(&mut self.timers, later);
        due.into_iter().map(|((_, handle), task)| (handle, task)).collect()
    }

    #[cfg(test)]
    pub fn advance_by(&mut self, delta: Duration) -> Vec<(TaskHandle, Task)> {
        let target = self.now + delta;
        self.advance_to(target)
    }

    /// Deliver one animation frame.  Only callbacks requested before this
    /// call are returned; anything they request lands on the next frame.
    pub fn take_frame(&mut self) -> Vec<(TaskHandle, Task)> {
        std::mem::take(&mut self.frames)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn has_frame_requests(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of live timers (frame requests excluded).
    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn next_handle(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }
}

impl Scheduler for TaskQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) -> TaskHandle {
        let handle = self.next_handle();
        self.timers.insert((self.now + delay, handle), task);
        handle
    }

    fn request_frame(&mut self, task: Task) -> TaskHandle {
        let handle = self.next_handle();
        self.frames.push((handle, task));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.timers.retain(|(_, h), _| *h != handle);
        self.frames.retain(|(h, _)| *h != handle);
    }
}
