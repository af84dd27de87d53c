//! Scroll sampling: turns a raw viewport reading into progress and
//! visibility.

use super::surface::ScrollSurface;

/// Offset (in distance units) the viewport must exceed before the control
/// becomes visible.
pub const VISIBILITY_THRESHOLD: f64 = 300.0;

/// Snapshot of the viewport taken each time the scroll signal fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// Distance from the top of the content.  Never negative.
    pub offset: f64,
    /// Content height minus viewport height.  Zero when nothing overflows.
    pub max_offset: f64,
}

impl ScrollSample {
    pub fn new(offset: f64, max_offset: f64) -> Self {
        Self {
            offset: non_negative(offset),
            max_offset: non_negative(max_offset),
        }
    }

    /// Read the current state of `surface`.
    pub fn read(surface: &impl ScrollSurface) -> Self {
        Self::new(surface.offset(), surface.max_offset())
    }

    /// Scroll progress in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        progress(self.offset, self.max_offset)
    }

    /// `true` once the offset is strictly past `threshold`.
    pub fn is_past(&self, threshold: f64) -> bool {
        is_past_threshold(self.offset, threshold)
    }
}

/// `offset / max_offset * 100`, clamped to `[0, 100]`.  A document with no
/// scrollable overflow has zero progress.
pub fn progress(offset: f64, max_offset: f64) -> f64 {
    if max_offset.is_nan() || max_offset <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_offset * 100.0).clamp(0.0, 100.0)
}

pub fn is_past_threshold(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

// NaN and negative readings collapse to the top of the document.
fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
