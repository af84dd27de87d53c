//! Document pane: a line-number gutter plus the visible slice of text.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::app::document::Document;

use super::theme::Theme;

pub struct DocumentView<'a> {
    document: &'a Document,
    block: Option<Block<'a>>,
}

impl<'a> DocumentView<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for DocumentView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.height == 0 {
            return;
        }

        let lines = self.document.lines();
        let gutter = lines.len().max(1).to_string().len();
        let top = self.document.top_row();
        let visible: Vec<Line> = lines
            .iter()
            .enumerate()
            .skip(top)
            .take(usize::from(inner.height))
            .map(|(i, text)| {
                Line::from(vec![
                    Span::styled(format!("{:>gutter$} ", i + 1), Theme::gutter_style()),
                    Span::styled(text.as_str(), Theme::text_style()),
                ])
            })
            .collect();

        Paragraph::new(visible).render(inner, buf);
    }
}
