//! # MediaDisplay Component
//!
//! One recommendation: a circular image badge with the title beside it.
//! When expanded (focused with Tab or hovered with the mouse) the title
//! column swaps to the full bullet list.
//!
//! ```text
//! compact                              expanded
//! ╭──────╮                             ╭──────╮  Raccoon Cake Pop
//! │  RC  │   Raccoon Cake Pop          │  RC  │  • Sweet flavor – stimulates ...
//! ╰──────╯                             ╰──────╯  • Playful raccoon design – ...
//! raccoon_cake_pop.png                 raccoon_cake_pop.png
//! ```
//!
//! Transient like `Message`: built fresh each frame, the expanded flag comes
//! from the parent.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use super::palette;
use crate::core::catalog::{Fragment, RecommendationEntry};

/// Badge column width in cells. Braille gives 2x4 dots per cell, so 14x7
/// cells is a 28x28 dot square.
const BADGE_WIDTH: u16 = 14;
const BADGE_HEIGHT: u16 = 7;
/// Badge plus the asset caption underneath.
const BADGE_COLUMN_HEIGHT: u16 = BADGE_HEIGHT + 1;
const GAP: u16 = 3;

#[derive(Clone, Copy)]
pub struct MediaDisplay<'a> {
    pub entry: &'a RecommendationEntry,
    pub expanded: bool,
}

impl<'a> MediaDisplay<'a> {
    pub fn new(entry: &'a RecommendationEntry, expanded: bool) -> Self {
        Self { entry, expanded }
    }

    /// Rows needed at `width`, so the parent can lay out the scroll view
    /// before rendering.
    pub fn calculate_height(entry: &RecommendationEntry, width: u16, expanded: bool) -> u16 {
        if !expanded {
            return BADGE_COLUMN_HEIGHT;
        }
        let text_width = width.saturating_sub(BADGE_WIDTH + GAP).max(1);
        let lines = Self::text_paragraph(entry, true).line_count(text_width) as u16;
        lines.max(BADGE_COLUMN_HEIGHT)
    }

    fn title_lines(entry: &RecommendationEntry) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            entry.title,
            Style::default()
                .fg(palette::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(subtitle) = entry.subtitle {
            lines.push(Line::from(Span::styled(
                subtitle,
                Style::default()
                    .fg(palette::INK)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        lines
    }

    fn bullet_line(bullet: &[Fragment]) -> Line<'static> {
        let mut spans = vec![Span::styled("• ", Style::default().fg(palette::ACCENT))];
        spans.extend(bullet.iter().map(|fragment| match fragment {
            Fragment::Strong(text) => Span::styled(
                *text,
                Style::default()
                    .fg(palette::INK)
                    .add_modifier(Modifier::BOLD),
            ),
            Fragment::Plain(text) => Span::styled(*text, Style::default().fg(palette::INK)),
        }));
        Line::from(spans)
    }

    fn text_paragraph(entry: &RecommendationEntry, expanded: bool) -> Paragraph<'static> {
        let mut lines = Self::title_lines(entry);
        if expanded {
            lines.extend(entry.bullets.iter().map(|b| Self::bullet_line(b)));
        }
        Paragraph::new(lines).wrap(Wrap { trim: true })
    }

    /// Up to two initials from the title, shown inside the badge.
    fn initials(title: &str) -> String {
        title
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .filter(|c| c.is_alphabetic())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }

    fn caption(image_ref: &str) -> &str {
        image_ref.rsplit('/').next().unwrap_or(image_ref)
    }
}

impl<'a> Widget for MediaDisplay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [badge_col, _, text_area] = Layout::horizontal([
            Constraint::Length(BADGE_WIDTH),
            Constraint::Length(GAP),
            Constraint::Min(1),
        ])
        .areas(area);
        let [badge_area, caption_area] =
            Layout::vertical([Constraint::Length(BADGE_HEIGHT), Constraint::Length(1)])
                .areas(badge_col);

        let initials = Self::initials(self.entry.title);
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 0.95,
                    color: palette::DARK_GREEN,
                });
                ctx.print(
                    -0.15,
                    0.0,
                    Span::styled(
                        initials.clone(),
                        Style::default()
                            .fg(palette::DARK_GREEN)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            })
            .render(badge_area, buf);

        Paragraph::new(Span::styled(
            Self::caption(self.entry.image_ref).to_string(),
            Style::default()
                .fg(palette::INK)
                .add_modifier(Modifier::DIM),
        ))
        .render(caption_area, buf);

        let paragraph = Self::text_paragraph(self.entry, self.expanded);
        if self.expanded {
            paragraph.render(text_area, buf);
        } else {
            // Compact: title block centered against the badge
            let title_height = 1 + u16::from(self.entry.subtitle.is_some());
            let [_, centered, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(title_height),
                Constraint::Fill(1),
            ])
            .areas(text_area);
            paragraph.render(centered, buf);
        }
    }
}
