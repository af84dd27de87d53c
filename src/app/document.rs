//! The pager's scrollable document.
//!
//! Offsets are kept in distance units rather than rows so that the
//! scroll-to-top animation can move smoothly between rows; the view rounds
//! down to the first fully visible row.

use std::path::Path;

use anyhow::Context;

use crate::core::surface::ScrollSurface;

#[derive(Debug)]
pub struct Document {
    pub title: String,
    lines: Vec<String>,
    /// Distance from the top, in units.
    offset: f64,
    /// Text rows that fit in the pane.
    viewport_rows: u16,
    /// Distance units per text row.
    row_units: f64,
    /// Set on every offset or extent change, cleared by [`take_changed`].
    ///
    /// [`take_changed`]: Document::take_changed
    changed: bool,
}

impl Document {
    pub fn new(title: impl Into<String>, lines: Vec<String>, row_units: f64) -> Self {
        Self {
            title: title.into(),
            lines,
            offset: 0.0,
            viewport_rows: 0,
            row_units: row_units.max(1.0),
            changed: true,
        }
    }

    /// Read a text file, one document line per file line.
    pub fn load(path: &Path, row_units: f64) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let lines = text.lines().map(|l| l.replace('\t', "    ")).collect();
        Ok(Self::new(path.display().to_string(), lines, row_units))
    }

    /// A generated listing long enough to exercise the control.
    pub fn demo(line_count: usize, row_units: f64) -> Self {
        const ITEMS: &[&str] = &[
            "Canvas tote bag",
            "Ceramic pour-over set",
            "Wireless earbuds",
            "Linen throw blanket",
            "Trail running shoes",
            "Cast-iron skillet",
            "Mechanical keyboard",
            "Desk plant (pothos)",
        ];
        let lines = (0..line_count)
            .map(|i| {
                let item = ITEMS[i % ITEMS.len()];
                let price = 9 + (i * 37) % 190;
                format!("#{:04}  {:<24} ${}.99", i + 1, item, price)
            })
            .collect();
        Self::new("demo catalogue", lines, row_units)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Resize the pane.  Re-clamps the offset against the new extent.
    pub fn set_viewport_rows(&mut self, rows: u16) {
        if rows == self.viewport_rows {
            return;
        }
        self.viewport_rows = rows;
        self.changed = true;
        let clamped = self.clamp(self.offset);
        self.offset = clamped;
    }

    /// Index of the first row shown at the top of the pane.
    pub fn top_row(&self) -> usize {
        (self.offset / self.row_units).floor() as usize
    }

    /// Scroll by whole rows; negative moves up.
    pub fn scroll_rows(&mut self, rows: i32) {
        let target = self.offset + f64::from(rows) * self.row_units;
        self.set_offset(target);
    }

    pub fn page(&mut self, down: bool) {
        let rows = i32::from(self.viewport_rows.saturating_sub(1).max(1));
        self.scroll_rows(if down { rows } else { -rows });
    }

    pub fn jump_bottom(&mut self) {
        let max = self.max_offset();
        self.set_offset(max);
    }

    /// Whether the offset or extent moved since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    fn clamp(&self, offset: f64) -> f64 {
        if !offset.is_finite() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_offset())
    }
}

impl ScrollSurface for Document {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn max_offset(&self) -> f64 {
        let overflow = self.lines.len().saturating_sub(usize::from(self.viewport_rows));
        overflow as f64 * self.row_units
    }

    fn set_offset(&mut self, offset: f64) {
        let clamped = self.clamp(offset);
        if clamped != self.offset {
            self.offset = clamped;
            self.changed = true;
        }
    }
}
