//! Layout helpers that split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the document pane and a bottom status bar.
pub struct AppLayout {
    pub document_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // document pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            document_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

/// Anchor a `width`×`height` box to the bottom-right corner of `area`,
/// inset by `margin` cells.  Returns `None` when it does not fit.
pub fn bottom_right(area: Rect, width: u16, height: u16, margin: u16) -> Option<Rect> {
    let need_w = width.checked_add(margin.saturating_mul(2))?;
    let need_h = height.checked_add(margin.saturating_mul(2))?;
    if area.width < need_w || area.height < need_h {
        return None;
    }
    Some(Rect::new(
        area.x + area.width - width - margin,
        area.y + area.height - height - margin,
        width,
        height,
    ))
}
