//! # StaticCatalog Component
//!
//! The full menu as a grid on the dark band below the recommendations.
//! Six columns when the terminal is wide enough, fewer otherwise.
//!
//! Names are wrapped with `textwrap` and drawn line by line, so the height
//! computed up front is exactly the height rendered.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

use super::palette;
use crate::core::catalog::MenuItem;

const MAX_COLUMNS: u16 = 6;
const MIN_CELL_WIDTH: u16 = 18;
/// Blank rows above and below the grid.
const PAD_V: u16 = 1;

#[derive(Clone, Copy)]
pub struct StaticCatalog<'a> {
    pub items: &'a [MenuItem],
}

impl<'a> StaticCatalog<'a> {
    pub fn new(items: &'a [MenuItem]) -> Self {
        Self { items }
    }

    pub fn columns_for(width: u16) -> u16 {
        (width / MIN_CELL_WIDTH).clamp(1, MAX_COLUMNS)
    }

    fn cell_width(width: u16) -> u16 {
        width / Self::columns_for(width)
    }

    fn wrap_name(name: &str, cell_width: u16) -> Vec<String> {
        let text_width = cell_width.saturating_sub(2).max(1) as usize;
        let options = textwrap::Options::new(text_width)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        textwrap::wrap(name, options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }

    /// Height of each grid row: icon line, wrapped name, one spacer.
    fn row_heights(items: &[MenuItem], width: u16) -> Vec<u16> {
        let columns = Self::columns_for(width) as usize;
        let cell_width = Self::cell_width(width);
        items
            .chunks(columns)
            .map(|row| {
                let name_lines = row
                    .iter()
                    .map(|item| Self::wrap_name(item.name, cell_width).len())
                    .max()
                    .unwrap_or(1) as u16;
                1 + name_lines + 1
            })
            .collect()
    }

    pub fn calculate_height(items: &[MenuItem], width: u16) -> u16 {
        Self::row_heights(items, width).iter().sum::<u16>() + PAD_V * 2
    }
}

impl<'a> Widget for StaticCatalog<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .style(Style::default().bg(palette::DARK_GREEN))
            .padding(Padding::vertical(PAD_V));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Self::columns_for(inner.width) as usize;
        let cell_width = Self::cell_width(inner.width);
        let heights = Self::row_heights(self.items, inner.width);

        let mut y = inner.y;
        for (row, height) in self.items.chunks(columns).zip(heights) {
            for (col, item) in row.iter().enumerate() {
                let x = inner.x + col as u16 * cell_width;
                let cell = Rect::new(x, y, cell_width, height).intersection(inner);
                if cell.is_empty() {
                    continue;
                }

                let mut lines = vec![Line::from(Span::styled(
                    "◉",
                    Style::default().fg(palette::ACCENT),
                ))];
                lines.extend(Self::wrap_name(item.name, cell_width).into_iter().map(|l| {
                    Line::from(Span::styled(
                        l,
                        Style::default()
                            .fg(palette::LIGHT_GREEN)
                            .add_modifier(Modifier::BOLD),
                    ))
                }));

                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(cell, buf);
            }
            y = y.saturating_add(height);
        }
    }
}
