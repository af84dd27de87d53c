//! The scrollable viewport, as seen by the controller.
//!
//! The controller never owns the scroll position.  It reads and writes it
//! through this trait, and whoever implements it promises to call
//! [`BackToTop::on_scroll`](super::controller::BackToTop::on_scroll) after
//! every change, including the ones the controller makes itself.

/// Read/write access to an externally owned scroll offset.
pub trait ScrollSurface {
    /// Current distance from the top.
    fn offset(&self) -> f64;

    /// Largest reachable offset (content height minus viewport height).
    fn max_offset(&self) -> f64;

    /// Move the viewport.  Implementations may clamp to `[0, max_offset]`.
    fn set_offset(&mut self, offset: f64);
}
