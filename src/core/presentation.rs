//! What the view layer needs to draw the control, and which keys count as
//! activating it.

/// Render description derived from controller state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub shown: bool,
    /// Portion of the progress ring to fill, in `[0, 1]`.
    pub ring_fill: f64,
    pub pulsing: bool,
}

impl RenderState {
    pub const HIDDEN: Self = Self {
        shown: false,
        ring_fill: 0.0,
        pulsing: false,
    };
}

pub fn present(visible: bool, progress: f64, pulse: bool) -> RenderState {
    RenderState {
        shown: visible,
        ring_fill: (progress / 100.0).clamp(0.0, 1.0),
        pulsing: pulse,
    }
}

/// Keyboard input as far as the control is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

impl Key {
    /// The two conventional submit/select keys.
    pub fn is_activation(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// Outcome of offering a key to the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The key activated the control; its default action must not run.
    Consumed,
    /// Not ours; the caller should handle it normally.
    Ignored,
}
