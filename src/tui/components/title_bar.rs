//! # TitleBar Component
//!
//! Top status bar: brand, mode, and the current status line.
//!
//! Stateless. All three props come from core `App` state; the bar doesn't
//! care where they come from.
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"Sunbucks · capture | Reading your mood..."`
//! 2. **Default**: `"Sunbucks · capture"`
//!
//! In poll mode a connectivity dot leads the status (green connected, red
//! disconnected, gray before the first poll).

use crate::Mode;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::palette;

pub struct TitleBar {
    pub mode: Mode,
    pub status_message: String,
    /// Poll mode only: `None` until the first poll completes.
    pub connected: Option<bool>,
}

impl TitleBar {
    pub fn new(mode: Mode, status_message: String, connected: Option<bool>) -> Self {
        Self {
            mode,
            status_message,
            connected,
        }
    }

    /// Spans making up the bar, without styling of the background.
    pub fn spans(&self) -> Vec<Span<'static>> {
        let mode = match self.mode {
            Mode::Capture => "capture",
            Mode::Poll => "poll",
        };

        let mut spans = vec![
            Span::styled(
                " Sunbucks",
                Style::default()
                    .fg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" · {mode}")),
        ];

        if self.mode == Mode::Poll {
            let color = match self.connected {
                Some(true) => Color::Green,
                Some(false) => Color::Red,
                None => Color::DarkGray,
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("●", Style::default().fg(color)));
        }

        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        spans
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let bar = Paragraph::new(Line::from(self.spans()))
            .style(Style::default().bg(palette::DARK_GREEN).fg(palette::LIGHT_GREEN));
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bar: &TitleBar) -> String {
        bar.spans().iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_capture_mode_with_status() {
        let bar = TitleBar::new(Mode::Capture, "Reading your mood...".into(), None);
        assert_eq!(text(&bar), " Sunbucks · capture | Reading your mood...");
    }

    #[test]
    fn test_empty_status_omitted() {
        let bar = TitleBar::new(Mode::Capture, String::new(), None);
        assert_eq!(text(&bar), " Sunbucks · capture");
    }

    #[test]
    fn test_poll_mode_shows_connectivity_dot() {
        let bar = TitleBar::new(Mode::Poll, "Disconnected · retrying".into(), Some(false));
        let spans = bar.spans();
        let dot = spans.iter().find(|s| s.content == "●").unwrap();
        assert_eq!(dot.style.fg, Some(Color::Red));
    }
}
