//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Duration;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::controller::BackToTop;
use crate::core::scheduler::TaskQueue;

use super::document::Document;

/// Cadence of the pulse emphasis redraw.
const PULSE_REDRAW: Duration = Duration::from_millis(100);

/// Which element receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Document,
    Control,
}

/// Top-level application state.
pub struct AppState {
    pub document: Document,
    pub controller: BackToTop,
    /// Timers and frame requests owned by the controller.
    pub tasks: TaskQueue,
    pub config: AppConfig,
    pub focus: Focus,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Where the control was last drawn, for mouse hit-testing.
    pub control_area: Option<Rect>,
    /// Time of the last delivered animation frame.
    last_frame: Duration,
}

impl AppState {
    pub fn new(document: Document, config: AppConfig) -> Self {
        let controller = BackToTop::new(config.controller_config());
        Self {
            document,
            controller,
            tasks: TaskQueue::new(),
            config,
            focus: Focus::default(),
            should_quit: false,
            status_message: None,
            control_area: None,
            last_frame: Duration::ZERO,
        }
    }

    /// Attach the control to the document.
    pub fn mount(&mut self) {
        self.document.take_changed();
        self.controller.mount(&self.document, &mut self.tasks);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount(&mut self.tasks);
    }

    /// Bring everything up to `now`: deliver pending scroll signals, fire
    /// due timers, and run one animation frame if one is due.
    pub fn pump(&mut self, now: Duration) {
        let due = self.tasks.advance_to(now);
        self.deliver_scroll();

        for (handle, task) in due {
            self.controller
                .run(handle, task, &mut self.document, &mut self.tasks);
            self.deliver_scroll();
        }

        // At most one frame per call.  The loop must wake again at
        // `next_wake` for the next one, so pacing follows `frame_interval`.
        if self.tasks.has_frame_requests() && now >= self.next_frame_at() {
            self.last_frame = now;
            for (handle, task) in self.tasks.take_frame() {
                self.controller
                    .run(handle, task, &mut self.document, &mut self.tasks);
                self.deliver_scroll();
            }
        }

        if self.focus == Focus::Control && !self.controller.render_state().shown {
            self.focus = Focus::Document;
        }
    }

    /// When the loop should wake up next if no input arrives.
    pub fn next_wake(&self, now: Duration) -> Option<Duration> {
        let mut wake = self.tasks.next_deadline();
        if self.tasks.has_frame_requests() {
            wake = Some(earliest(wake, self.next_frame_at().max(now)));
        }
        if self.controller.is_pulsing() {
            wake = Some(earliest(wake, now + PULSE_REDRAW));
        }
        wake
    }

    /// The scroll-change subscription: any offset or extent change since
    /// the last call is reported to the controller, in order.
    fn deliver_scroll(&mut self) {
        if self.document.take_changed() {
            self.controller.on_scroll(&self.document, &mut self.tasks);
        }
    }

    fn next_frame_at(&self) -> Duration {
        self.last_frame + self.config.frame_interval()
    }
}

fn earliest(a: Option<Duration>, b: Duration) -> Duration {
    a.map_or(b, |a| a.min(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::ScrollSurface;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn state() -> AppState {
        let mut doc = Document::demo(500, 16.0);
        doc.set_viewport_rows(20);
        let mut s = AppState::new(doc, AppConfig::default());
        s.mount();
        s
    }

    #[test]
    fn scrolling_past_threshold_shows_then_pulses() {
        let mut s = state();
        s.document.scroll_rows(18);
        s.pump(ms(0));
        assert!(!s.controller.is_visible());

        s.document.scroll_rows(1);
        s.pump(ms(10));
        assert!(s.controller.is_visible());
        assert_eq!(s.next_wake(ms(10)), Some(ms(5010)));

        s.pump(ms(5009));
        assert!(!s.controller.is_pulsing());
        s.pump(ms(5010));
        assert!(s.controller.is_pulsing());
    }

    #[test]
    fn frames_are_paced_by_the_frame_interval() {
        let mut s = state();
        s.document.scroll_rows(100);
        s.pump(ms(0));
        s.controller.activate(&s.document, &mut s.tasks);

        s.pump(ms(20));
        let after_first = s.document.offset();
        assert!(after_first < 1600.0);

        s.pump(ms(25));
        assert_eq!(s.document.offset(), after_first, "too early for another frame");

        let mut t = 36;
        while s.controller.is_scrolling() {
            s.pump(ms(t));
            t += 16;
            assert!(t < 10_000);
        }
        assert_eq!(s.document.offset(), 0.0);
        assert!(!s.controller.is_visible());
    }

    #[test]
    fn focus_falls_back_when_control_hides() {
        let mut s = state();
        s.document.scroll_rows(40);
        s.pump(ms(0));
        s.focus = Focus::Control;
        s.document.scroll_rows(-40);
        s.pump(ms(5));
        assert_eq!(s.focus, Focus::Document);
    }

    #[test]
    fn nothing_pending_after_unmount() {
        let mut s = state();
        s.document.scroll_rows(100);
        s.pump(ms(0));
        s.controller.activate(&s.document, &mut s.tasks);
        s.unmount();
        assert_eq!(s.next_wake(ms(0)), None);
        let offset = s.document.offset();
        s.pump(ms(60_000));
        assert_eq!(s.document.offset(), offset);
    }
}
