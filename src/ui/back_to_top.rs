//! The back-to-top control: an arrow inside a progress ring.
//!
//! The ring is the box border.  Starting at the top centre and running
//! clockwise, the first `ring_fill × perimeter` cells are lit.  While the
//! control pulses, the lit cells and the label blink on a fixed period.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Clear, Widget},
};

use crate::core::presentation::RenderState;

use super::theme::Theme;

/// Half-period of the pulse blink.
const PULSE_HALF_PERIOD_MS: u128 = 500;

const LABEL: &str = "↑ Top";

pub struct BackToTopButton {
    pub state: RenderState,
    pub focused: bool,
    /// Time on the application clock, drives the blink phase.
    pub elapsed: Duration,
}

impl BackToTopButton {
    pub const WIDTH: u16 = 9;
    pub const HEIGHT: u16 = 3;
}

impl Widget for BackToTopButton {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.shown || area.width < 3 || area.height < 3 {
            return;
        }
        Clear.render(area, buf);

        let emphasis = self.state.pulsing && pulse_phase(self.elapsed);
        let lit_style = if emphasis {
            Theme::pulse_style()
        } else {
            Theme::ring_lit_style()
        };

        let cells = ring_cells(area);
        let lit = lit_count(self.state.ring_fill, cells.len());
        for (i, &(x, y)) in cells.iter().enumerate() {
            let style = if i < lit {
                lit_style
            } else {
                Theme::ring_dim_style()
            };
            buf[(x, y)].set_symbol(ring_glyph(area, x, y)).set_style(style);
        }

        let label_style: Style = if emphasis {
            Theme::pulse_style()
        } else {
            Theme::arrow_style(self.focused)
        };
        let inner_w = area.width - 2;
        let label_w = LABEL.chars().count() as u16;
        let pad = inner_w.saturating_sub(label_w) / 2;
        let mid = area.y + area.height / 2;
        buf.set_stringn(area.x + 1 + pad, mid, LABEL, usize::from(inner_w - pad), label_style);
    }
}

/// `true` during the emphasised half of the blink cycle.
pub fn pulse_phase(elapsed: Duration) -> bool {
    (elapsed.as_millis() / PULSE_HALF_PERIOD_MS) % 2 == 0
}

/// Border cells of `area` in clockwise order, starting at the top centre.
pub fn ring_cells(area: Rect) -> Vec<(u16, u16)> {
    if area.width == 0 || area.height == 0 {
        return Vec::new();
    }
    let (left, top) = (area.x, area.y);
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;

    let mut cells: Vec<(u16, u16)> = (left..=right).map(|x| (x, top)).collect();
    if bottom > top {
        cells.extend((top + 1..=bottom).map(|y| (right, y)));
        if right > left {
            cells.extend((left..right).rev().map(|x| (x, bottom)));
        }
        cells.extend((top + 1..bottom).rev().map(|y| (left, y)));
    }

    let start = usize::from(area.width / 2);
    cells.rotate_left(start);
    cells
}

/// Number of ring cells to light for a fill fraction.
pub fn lit_count(fill: f64, total: usize) -> usize {
    let fill = if fill.is_finite() { fill.clamp(0.0, 1.0) } else { 0.0 };
    (fill * total as f64).round() as usize
}

fn ring_glyph(area: Rect, x: u16, y: u16) -> &'static str {
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;
    match (x == area.x, x == right, y == area.y, y == bottom) {
        (true, _, true, _) => "╭",
        (_, true, true, _) => "╮",
        (true, _, _, true) => "╰",
        (_, true, _, true) => "╯",
        (_, _, true, _) | (_, _, _, true) => "─",
        _ => "│",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(state: RenderState) -> BackToTopButton {
        BackToTopButton {
            state,
            focused: false,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn ring_covers_perimeter_from_top_centre() {
        let area = Rect::new(10, 5, 9, 3);
        let cells = ring_cells(area);
        assert_eq!(cells.len(), 2 * 9 + 2 * 3 - 4);
        assert_eq!(cells[0], (14, 5));
        assert_eq!(cells[1], (15, 5));
        // Last cell sits just left of the start.
        assert_eq!(cells[cells.len() - 1], (13, 5));

        let mut unique = cells.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), cells.len());
    }

    #[test]
    fn lit_count_rounds_and_clamps() {
        assert_eq!(lit_count(0.0, 20), 0);
        assert_eq!(lit_count(0.5, 20), 10);
        assert_eq!(lit_count(1.0, 20), 20);
        assert_eq!(lit_count(3.0, 20), 20);
        assert_eq!(lit_count(f64::NAN, 20), 0);
    }

    #[test]
    fn hidden_control_draws_nothing() {
        let area = Rect::new(0, 0, 9, 3);
        let mut buf = Buffer::empty(area);
        button(RenderState::HIDDEN).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn shown_control_draws_ring_and_label() {
        let area = Rect::new(0, 0, 9, 3);
        let mut buf = Buffer::empty(area);
        let state = RenderState {
            shown: true,
            ring_fill: 0.5,
            pulsing: false,
        };
        button(state).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "╭");
        assert_eq!(buf[(8, 2)].symbol(), "╯");
        assert_eq!(buf[(2, 1)].symbol(), "↑");

        let cells = ring_cells(area);
        let lit = Theme::ring_lit_style().fg;
        let dim = Theme::ring_dim_style().fg;
        assert_eq!(buf[cells[0]].fg, lit.unwrap());
        assert_eq!(buf[cells[9]].fg, lit.unwrap());
        assert_eq!(buf[cells[10]].fg, dim.unwrap());
    }

    #[test]
    fn pulse_blinks() {
        assert!(pulse_phase(Duration::from_millis(0)));
        assert!(!pulse_phase(Duration::from_millis(600)));
        assert!(pulse_phase(Duration::from_millis(1100)));
    }
}
