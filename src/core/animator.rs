//! Frame-driven scroll back to the top.
//!
//! On activation the starting offset is split into equal steps, one per
//! frame, sized so the run lasts roughly `duration`.  Each frame reads the
//! *current* offset, so manual scrolling during a run just shifts where the
//! remaining steps land.  A step that would cross zero writes exactly zero
//! and ends the run.

use std::time::Duration;

use super::scheduler::{Scheduler, Task, TaskHandle};
use super::surface::ScrollSurface;

/// Nominal length of one scroll-to-top run.
pub const SCROLL_DURATION: Duration = Duration::from_millis(500);

/// Nominal display refresh interval.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    duration: Duration,
    frame: Duration,
    /// Outstanding frame request.  `Some` exactly while a run is active.
    frame_req: Option<TaskHandle>,
    /// Distance removed per frame for the current run.
    step: f64,
}

impl ScrollAnimator {
    pub fn new(duration: Duration, frame: Duration) -> Self {
        Self {
            duration,
            frame,
            frame_req: None,
            step: 0.0,
        }
    }

    /// Start a run from the current offset.  Returns `false` when a run is
    /// already active (re-entry is ignored) or there is nowhere to go.
    pub fn activate(&mut self, surface: &impl ScrollSurface, sched: &mut impl Scheduler) -> bool {
        if self.is_running() {
            tracing::debug!("scroll-to-top already running; activation ignored");
            return false;
        }
        let start = surface.offset();
        if start <= 0.0 {
            return false;
        }
        self.step = start / self.steps_per_run();
        self.frame_req = Some(sched.request_frame(Task::ScrollStep));
        tracing::debug!(start, step = self.step, "scroll-to-top started");
        true
    }

    /// One frame of the run.  Returns `true` if `handle` was the live
    /// request and the surface was touched.
    pub fn step(
        &mut self,
        handle: TaskHandle,
        surface: &mut impl ScrollSurface,
        sched: &mut impl Scheduler,
    ) -> bool {
        if self.frame_req != Some(handle) {
            return false;
        }
        self.frame_req = None;

        let current = surface.offset();
        if current <= 0.0 {
            tracing::debug!("scroll-to-top finished");
            return false;
        }
        let next = (current - self.step).max(0.0);
        surface.set_offset(next);
        if next > 0.0 {
            self.frame_req = Some(sched.request_frame(Task::ScrollStep));
        } else {
            tracing::debug!("scroll-to-top finished");
        }
        true
    }

    /// Abandon the current run, if any.
    pub fn stop(&mut self, sched: &mut impl Scheduler) {
        if let Some(handle) = self.frame_req.take() {
            sched.cancel(handle);
            tracing::debug!("scroll-to-top stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame_req.is_some()
    }

    /// Distance removed per frame in the current (or last) run.
    #[cfg(test)]
    pub fn step_size(&self) -> f64 {
        self.step
    }

    fn steps_per_run(&self) -> f64 {
        let frame = self.frame.as_nanos();
        if frame == 0 {
            return 1.0;
        }
        (self.duration.as_nanos() as f64 / frame as f64).max(1.0)
    }
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(SCROLL_DURATION, FRAME_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::TaskQueue;
    use crate::core::surface::fake::FakeSurface;

    /// Deliver frames until the run ends; returns how many frames ran.
    fn run_frames(a: &mut ScrollAnimator, s: &mut FakeSurface, q: &mut TaskQueue) -> usize {
        let mut frames = 0;
        while q.has_frame_requests() {
            for (handle, _) in q.take_frame() {
                a.step(handle, s, q);
            }
            frames += 1;
            assert!(frames < 10_000, "animation never terminated");
        }
        frames
    }

    #[test]
    fn constant_steps_then_clamped_to_zero() {
        let mut q = TaskQueue::new();
        let mut s = FakeSurface::new(1000.0, 5000.0);
        let mut a = ScrollAnimator::default();
        assert!(a.activate(&s, &mut q));

        let step = 1000.0 / (500.0 / 16.0);
        assert_eq!(a.step_size(), step);

        let frames = run_frames(&mut a, &mut s, &mut q);
        assert_eq!(s.offset, 0.0);
        assert_eq!(frames, 32);
        for pair in s.writes.windows(2) {
            let delta = pair[0] - pair[1];
            assert!(delta > 0.0 && delta <= step + 1e-9);
        }
        assert!(s.writes.iter().all(|&w| w >= 0.0));
        assert!(!a.is_running());
    }

    #[test]
    fn first_step_waits_for_a_frame() {
        let mut q = TaskQueue::new();
        let s = FakeSurface::new(400.0, 1000.0);
        let mut a = ScrollAnimator::default();
        a.activate(&s, &mut q);
        assert!(s.writes.is_empty());
        assert!(q.has_frame_requests());
    }

    #[test]
    fn second_activation_while_running_is_ignored() {
        let mut once = ScrollAnimator::default();
        let mut q1 = TaskQueue::new();
        let mut s1 = FakeSurface::new(1000.0, 5000.0);
        assert!(once.activate(&s1, &mut q1));
        run_frames(&mut once, &mut s1, &mut q1);

        let mut twice = ScrollAnimator::default();
        let mut q2 = TaskQueue::new();
        let mut s2 = FakeSurface::new(1000.0, 5000.0);
        assert!(twice.activate(&s2, &mut q2));
        assert!(!twice.activate(&s2, &mut q2));
        run_frames(&mut twice, &mut s2, &mut q2);

        assert_eq!(s2.writes, s1.writes);
        assert_eq!(s2.offset, 0.0);
    }

    #[test]
    fn activation_at_top_does_nothing() {
        let mut q = TaskQueue::new();
        let s = FakeSurface::new(0.0, 5000.0);
        let mut a = ScrollAnimator::default();
        assert!(!a.activate(&s, &mut q));
        assert!(!q.has_frame_requests());
    }

    #[test]
    fn reads_current_offset_each_frame() {
        let mut q = TaskQueue::new();
        let mut s = FakeSurface::new(1000.0, 5000.0);
        let mut a = ScrollAnimator::default();
        a.activate(&s, &mut q);
        for (h, _) in q.take_frame() {
            a.step(h, &mut s, &mut q);
        }
        assert_eq!(s.offset, 968.0);

        // User drags the page down mid-run.
        s.offset = 2000.0;
        for (h, _) in q.take_frame() {
            a.step(h, &mut s, &mut q);
        }
        assert_eq!(s.offset, 1968.0);
        run_frames(&mut a, &mut s, &mut q);
        assert_eq!(s.offset, 0.0);
    }

    #[test]
    fn stop_breaks_the_frame_chain() {
        let mut q = TaskQueue::new();
        let mut s = FakeSurface::new(1000.0, 5000.0);
        let mut a = ScrollAnimator::default();
        a.activate(&s, &mut q);
        let pending = q.take_frame();
        a.stop(&mut q);
        for (h, _) in pending {
            assert!(!a.step(h, &mut s, &mut q));
        }
        assert!(s.writes.is_empty());
        assert!(!q.has_frame_requests());
    }
}
