//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme.  Change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── document pane ─────────────────────────────────────────
    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn gutter_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── back-to-top control ───────────────────────────────────
    pub fn ring_lit_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn ring_dim_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn arrow_style(focused: bool) -> Style {
        let style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if focused {
            style.bg(Color::DarkGray)
        } else {
            style
        }
    }

    /// Emphasis frame of the attention pulse.
    pub fn pulse_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
