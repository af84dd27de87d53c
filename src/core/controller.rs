//! The "back to top" controller.
//!
//! One instance per mounted control.  Scroll signals drive everything:
//! each one re-samples the surface, updates progress, and forwards
//! visibility flips to the pulse scheduler.  Activation starts the
//! scroll-to-top animator, whose writes come back as ordinary scroll
//! signals.
//!
//! After [`BackToTop::unmount`] every entry point is inert, so late timers
//! or frames delivered by the environment cannot touch anything.

use std::time::Duration;

use super::animator::{ScrollAnimator, FRAME_INTERVAL, SCROLL_DURATION};
use super::presentation::{present, Key, KeyDisposition, RenderState};
use super::pulse::{PulseScheduler, PULSE_DELAY};
use super::sample::{ScrollSample, VISIBILITY_THRESHOLD};
use super::scheduler::{Scheduler, Task, TaskHandle};
use super::surface::ScrollSurface;

/// Tunables for one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub threshold: f64,
    pub pulse_delay: Duration,
    pub scroll_duration: Duration,
    pub frame_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            threshold: VISIBILITY_THRESHOLD,
            pulse_delay: PULSE_DELAY,
            scroll_duration: SCROLL_DURATION,
            frame_interval: FRAME_INTERVAL,
        }
    }
}

#[derive(Debug)]
pub struct BackToTop {
    threshold: f64,
    mounted: bool,
    sample: ScrollSample,
    progress: f64,
    visible: bool,
    pulse: PulseScheduler,
    animator: ScrollAnimator,
}

impl BackToTop {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            threshold: config.threshold,
            mounted: false,
            sample: ScrollSample::new(0.0, 0.0),
            progress: 0.0,
            visible: false,
            pulse: PulseScheduler::new(config.pulse_delay),
            animator: ScrollAnimator::new(config.scroll_duration, config.frame_interval),
        }
    }

    /// Start listening.  Takes an initial sample right away so a view that
    /// mounts already scrolled shows the control immediately.
    pub fn mount(&mut self, surface: &impl ScrollSurface, sched: &mut impl Scheduler) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        tracing::debug!(threshold = self.threshold, "back-to-top mounted");
        self.on_scroll(surface, sched);
    }

    /// Scroll signal: re-read the surface and update derived state.
    pub fn on_scroll(&mut self, surface: &impl ScrollSurface, sched: &mut impl Scheduler) {
        if !self.mounted {
            return;
        }
        self.sample = ScrollSample::read(surface);
        self.progress = self.sample.progress();

        let previous = self.visible;
        let next = self.sample.is_past(self.threshold);
        if previous != next {
            tracing::debug!(offset = self.sample.offset, visible = next, "visibility changed");
            self.visible = next;
            self.pulse.on_visibility_changed(previous, next, sched);
        }
    }

    /// Route a due task back to the mechanism that scheduled it.  Returns
    /// `true` if it changed anything.
    pub fn run(
        &mut self,
        handle: TaskHandle,
        task: Task,
        surface: &mut impl ScrollSurface,
        sched: &mut impl Scheduler,
    ) -> bool {
        if !self.mounted {
            return false;
        }
        match task {
            Task::Pulse => self.pulse.fire(handle),
            Task::ScrollStep => self.animator.step(handle, surface, sched),
        }
    }

    /// Pointer activation.  Clears the pulse and starts scrolling to the
    /// top unless a run is already in progress.
    pub fn activate(&mut self, surface: &impl ScrollSurface, sched: &mut impl Scheduler) -> bool {
        if !self.mounted {
            return false;
        }
        self.pulse.acknowledge();
        self.animator.activate(surface, sched)
    }

    /// Keyboard activation.  Enter and Space behave like a click and must
    /// not reach their default handler.
    pub fn on_key(
        &mut self,
        key: Key,
        surface: &impl ScrollSurface,
        sched: &mut impl Scheduler,
    ) -> KeyDisposition {
        if !self.mounted || !key.is_activation() {
            return KeyDisposition::Ignored;
        }
        self.activate(surface, sched);
        KeyDisposition::Consumed
    }

    /// Stop listening and drop any pending timer or frame.
    pub fn unmount(&mut self, sched: &mut impl Scheduler) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.pulse.cancel(sched);
        self.animator.stop(sched);
        tracing::debug!("back-to-top unmounted");
    }

    pub fn render_state(&self) -> RenderState {
        if !self.mounted {
            return RenderState::HIDDEN;
        }
        present(self.visible, self.progress, self.pulse.is_active())
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_active()
    }

    pub fn is_scrolling(&self) -> bool {
        self.animator.is_running()
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::TaskQueue;
    use crate::core::surface::fake::FakeSurface;

    /// Environment stand-in: a surface, a queue, and the controller, wired
    /// the way the pager wires them.
    struct Harness {
        surface: FakeSurface,
        queue: TaskQueue,
        ctl: BackToTop,
    }

    impl Harness {
        fn mounted_at(offset: f64) -> Self {
            let mut h = Self {
                surface: FakeSurface::new(offset, 10_000.0),
                queue: TaskQueue::new(),
                ctl: BackToTop::default(),
            };
            h.ctl.mount(&h.surface, &mut h.queue);
            h
        }

        fn scroll_to(&mut self, offset: f64) {
            self.surface.offset = offset;
            self.ctl.on_scroll(&self.surface, &mut self.queue);
        }

        fn advance_to(&mut self, ms: u64) {
            for (handle, task) in self.queue.advance_to(Duration::from_millis(ms)) {
                self.ctl.run(handle, task, &mut self.surface, &mut self.queue);
            }
        }

        /// One display frame, followed by the scroll signal its writes cause.
        fn frame(&mut self) {
            for (handle, task) in self.queue.take_frame() {
                if self.ctl.run(handle, task, &mut self.surface, &mut self.queue) {
                    self.ctl.on_scroll(&self.surface, &mut self.queue);
                }
            }
        }

        fn frames_until_idle(&mut self) -> usize {
            let mut n = 0;
            while self.queue.has_frame_requests() {
                self.frame();
                n += 1;
                assert!(n < 10_000);
            }
            n
        }
    }

    #[test]
    fn initial_sample_at_mount() {
        let h = Harness::mounted_at(2500.0);
        let r = h.ctl.render_state();
        assert!(r.shown);
        assert_eq!(r.ring_fill, 0.25);
        assert_eq!(h.queue.pending_timers(), 1);
    }

    #[test]
    fn hidden_at_299_visible_at_301() {
        let mut h = Harness::mounted_at(0.0);
        h.scroll_to(299.0);
        assert!(!h.ctl.is_visible());
        h.scroll_to(301.0);
        assert!(h.ctl.is_visible());
    }

    #[test]
    fn pulse_fires_once_after_steady_visibility() {
        let mut h = Harness::mounted_at(0.0);
        h.scroll_to(500.0);
        h.advance_to(4999);
        assert!(!h.ctl.is_pulsing());
        h.advance_to(5000);
        assert!(h.ctl.is_pulsing());
        assert_eq!(h.queue.pending_timers(), 0);

        // More scrolling while visible does not re-arm anything.
        h.scroll_to(800.0);
        assert_eq!(h.queue.pending_timers(), 0);
        assert!(h.ctl.render_state().pulsing);
    }

    #[test]
    fn bounce_across_threshold_restarts_the_delay() {
        let mut h = Harness::mounted_at(0.0);
        h.scroll_to(500.0);
        h.advance_to(2000);
        h.scroll_to(100.0);
        h.advance_to(3000);
        h.scroll_to(500.0);

        h.advance_to(5000);
        assert!(!h.ctl.is_pulsing());
        h.advance_to(7999);
        assert!(!h.ctl.is_pulsing());
        h.advance_to(8000);
        assert!(h.ctl.is_pulsing());
    }

    #[test]
    fn pulse_only_while_visible() {
        let mut h = Harness::mounted_at(600.0);
        h.advance_to(5000);
        assert!(h.ctl.is_pulsing());
        h.scroll_to(10.0);
        let r = h.ctl.render_state();
        assert!(!r.shown);
        assert!(!r.pulsing);
    }

    #[test]
    fn activation_scrolls_to_top_and_hides() {
        let mut h = Harness::mounted_at(1000.0);
        h.advance_to(5000);
        assert!(h.ctl.is_pulsing());

        assert!(h.ctl.activate(&h.surface, &mut h.queue));
        assert!(!h.ctl.is_pulsing(), "activation acknowledges the pulse");

        let frames = h.frames_until_idle();
        assert_eq!(frames, 32);
        assert_eq!(h.surface.offset, 0.0);
        assert!(!h.ctl.is_visible());
        assert_eq!(h.ctl.progress(), 0.0);
        assert!(!h.ctl.is_scrolling());
    }

    #[test]
    fn pending_pulse_survives_activation_while_visible() {
        let mut h = Harness::mounted_at(1000.0);
        h.advance_to(1000);
        assert!(h.ctl.activate(&h.surface, &mut h.queue));
        assert_eq!(h.queue.pending_timers(), 1);

        // The user outruns the animation, so the control never hides.
        h.frame();
        h.scroll_to(50_000.0);
        h.advance_to(4999);
        assert!(!h.ctl.is_pulsing());
        h.advance_to(5000);
        assert!(h.ctl.is_visible());
        assert!(h.ctl.is_pulsing());
    }

    #[test]
    fn hiding_after_activation_still_drops_the_timer() {
        let mut h = Harness::mounted_at(1000.0);
        h.ctl.activate(&h.surface, &mut h.queue);
        h.frames_until_idle();
        assert!(!h.ctl.is_visible());
        assert_eq!(h.queue.pending_timers(), 0);
        h.advance_to(10_000);
        assert!(!h.ctl.is_pulsing());
    }

    #[test]
    fn double_activation_matches_single() {
        let mut once = Harness::mounted_at(1000.0);
        once.ctl.activate(&once.surface, &mut once.queue);
        once.frames_until_idle();

        let mut twice = Harness::mounted_at(1000.0);
        twice.ctl.activate(&twice.surface, &mut twice.queue);
        twice.ctl.activate(&twice.surface, &mut twice.queue);
        twice.frames_until_idle();

        assert_eq!(once.surface.writes, twice.surface.writes);
    }

    #[test]
    fn activation_keys_are_consumed() {
        let mut h = Harness::mounted_at(1000.0);
        assert_eq!(
            h.ctl.on_key(Key::Other, &h.surface, &mut h.queue),
            KeyDisposition::Ignored
        );
        assert!(!h.ctl.is_scrolling());
        assert_eq!(
            h.ctl.on_key(Key::Enter, &h.surface, &mut h.queue),
            KeyDisposition::Consumed
        );
        assert!(h.ctl.is_scrolling());
        // Still consumed while running, even though it starts nothing new.
        assert_eq!(
            h.ctl.on_key(Key::Space, &h.surface, &mut h.queue),
            KeyDisposition::Consumed
        );
    }

    #[test]
    fn nothing_happens_after_unmount() {
        let mut h = Harness::mounted_at(1000.0);
        h.ctl.activate(&h.surface, &mut h.queue);
        h.frame();
        let offset = h.surface.offset;

        // Grab what is queued before teardown so it can be delivered late.
        let late_frames = h.queue.take_frame();
        h.scroll_to(500.0);
        h.scroll_to(100.0);
        h.scroll_to(700.0); // re-arms the pulse timer
        assert_eq!(h.queue.pending_timers(), 1);
        let writes = h.surface.writes.len();

        h.ctl.unmount(&mut h.queue);
        assert_eq!(h.queue.pending_timers(), 0);
        assert!(!h.queue.has_frame_requests());

        for (handle, task) in late_frames {
            assert!(!h.ctl.run(handle, task, &mut h.surface, &mut h.queue));
        }
        h.advance_to(60_000);
        h.frame();
        h.scroll_to(9000.0);

        assert_eq!(h.surface.writes.len(), writes);
        assert!(!h.ctl.is_pulsing());
        assert!(!h.ctl.activate(&h.surface, &mut h.queue));
        assert_eq!(h.ctl.render_state(), RenderState::HIDDEN);
        assert!(offset < 1000.0);
    }

    #[test]
    fn zero_height_document_never_shows() {
        let mut h = Harness::mounted_at(0.0);
        h.surface.max_offset = 0.0;
        h.scroll_to(0.0);
        assert_eq!(h.ctl.progress(), 0.0);
        assert!(!h.ctl.render_state().shown);
    }
}
