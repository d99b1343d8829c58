//! # CameraPanel Component
//!
//! The capture card: a bordered panel showing the mirrored preview and one
//! hint line telling the customer what to press next.
//!
//! The preview is drawn with upper half blocks (`▀`): foreground is the top
//! pixel, background the bottom one, so each cell carries two image rows.

use image::RgbImage;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use super::palette;
use crate::core::flow::{CaptureState, FlowError};

/// Rows the panel occupies, borders included.
pub const PANEL_HEIGHT: u16 = 18;
const MAX_PANEL_WIDTH: u16 = 64;

#[derive(Clone, Copy)]
pub struct CameraPanel<'a> {
    pub state: CaptureState,
    pub error: Option<&'a FlowError>,
    /// Last mirrored frame, if any.
    pub preview: Option<&'a RgbImage>,
    pub camera_name: &'a str,
}

impl<'a> CameraPanel<'a> {
    pub fn calculate_height() -> u16 {
        PANEL_HEIGHT
    }

    /// Centered horizontal slot the panel uses inside `area`.
    pub fn panel_area(area: Rect) -> Rect {
        let width = area.width.min(MAX_PANEL_WIDTH);
        let [_, panel, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(area);
        panel
    }

    pub fn hint(&self) -> Line<'static> {
        let key = Style::default()
            .fg(palette::ACCENT)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(palette::INK);
        match self.state {
            CaptureState::Idle => Line::from(vec![
                Span::styled("Press ", text),
                Span::styled("Space", key),
                Span::styled(" to turn on the camera", text),
            ]),
            CaptureState::CameraActive => Line::from(vec![
                Span::styled("Space", key),
                Span::styled(" to snap", text),
            ]),
            CaptureState::Capturing => Line::from(Span::styled(
                "Analyzing...",
                text.add_modifier(Modifier::ITALIC),
            )),
            CaptureState::Analyzed => Line::from(vec![
                Span::styled("r", key),
                Span::styled(" to retake", text),
            ]),
            CaptureState::Error => {
                let message = self
                    .error
                    .map(FlowError::user_message)
                    .unwrap_or("Something went wrong.");
                Line::from(vec![
                    Span::styled(message, Style::default().fg(Color::Red)),
                    Span::styled("  ", text),
                    Span::styled("r", key),
                    Span::styled(" to retry", text),
                ])
            }
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.state {
            CaptureState::Idle => "Camera off",
            CaptureState::Error => "No picture",
            _ => "Waiting for camera...",
        }
    }
}

/// Largest rect with the image's aspect ratio (cells are two pixels tall)
/// centered in `area`.
fn fit_image(image: &RgbImage, area: Rect) -> Rect {
    let (w, h) = (image.width().max(1), image.height().max(1));
    let max_w = u32::from(area.width);
    let max_px_h = u32::from(area.height) * 2;

    let (draw_w, draw_px_h) = if max_w * h <= max_px_h * w {
        (max_w, max_w * h / w)
    } else {
        (max_px_h * w / h, max_px_h)
    };
    let draw_w = draw_w.max(1) as u16;
    let draw_h = draw_px_h.div_ceil(2).max(1) as u16;

    Rect::new(
        area.x + (area.width.saturating_sub(draw_w)) / 2,
        area.y + (area.height.saturating_sub(draw_h)) / 2,
        draw_w.min(area.width),
        draw_h.min(area.height),
    )
}

fn render_half_blocks(image: &RgbImage, area: Rect, buf: &mut Buffer) {
    if area.is_empty() || image.width() == 0 || image.height() == 0 {
        return;
    }
    let target = fit_image(image, area);
    let px_rows = u32::from(target.height) * 2;
    let sample = |cx: u16, py: u32| {
        let sx = (u32::from(cx) * image.width() / u32::from(target.width)).min(image.width() - 1);
        let sy = (py * image.height() / px_rows).min(image.height() - 1);
        let [r, g, b] = image.get_pixel(sx, sy).0;
        Color::Rgb(r, g, b)
    };

    for cy in 0..target.height {
        for cx in 0..target.width {
            let top = sample(cx, u32::from(cy) * 2);
            let bottom = sample(cx, u32::from(cy) * 2 + 1);
            if let Some(cell) = buf.cell_mut((target.x + cx, target.y + cy)) {
                cell.set_symbol("▀").set_fg(top).set_bg(bottom);
            }
        }
    }
}

impl<'a> Widget for CameraPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Self::panel_area(area);
        let border_color = match self.state {
            CaptureState::Error => Color::Red,
            CaptureState::Capturing => palette::ACCENT,
            _ => palette::DARK_GREEN,
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", self.camera_name),
                Style::default().fg(palette::DARK_GREEN),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let [preview_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        match self.preview {
            Some(image) => render_half_blocks(image, preview_area, buf),
            None => {
                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(preview_area);
                Paragraph::new(Span::styled(
                    self.placeholder(),
                    Style::default()
                        .fg(palette::INK)
                        .add_modifier(Modifier::DIM),
                ))
                .alignment(Alignment::Center)
                .render(middle, buf);
            }
        }

        Paragraph::new(self.hint())
            .alignment(Alignment::Center)
            .render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn panel(state: CaptureState) -> CameraPanel<'static> {
        CameraPanel {
            state,
            error: None,
            preview: None,
            camera_name: "test pattern",
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_hint_follows_state() {
        assert_eq!(
            line_text(&panel(CaptureState::Idle).hint()),
            "Press Space to turn on the camera"
        );
        assert_eq!(line_text(&panel(CaptureState::CameraActive).hint()), "Space to snap");
        assert_eq!(line_text(&panel(CaptureState::Capturing).hint()), "Analyzing...");
        assert_eq!(line_text(&panel(CaptureState::Analyzed).hint()), "r to retake");
    }

    #[test]
    fn test_error_hint_uses_user_message() {
        let error = FlowError::PermissionDenied("denied by test".into());
        let mut p = panel(CaptureState::Error);
        p.error = Some(&error);
        let text = line_text(&p.hint());
        assert!(text.starts_with(error.user_message()));
        assert!(text.ends_with("r to retry"));
        assert!(!text.contains("denied by test"));
    }

    #[test]
    fn test_fit_image_keeps_aspect() {
        let image = RgbImage::new(160, 120);
        let fitted = fit_image(&image, Rect::new(0, 0, 60, 15));
        // 15 rows = 30 pixel rows; 4:3 gives 40 columns
        assert_eq!(fitted.height, 15);
        assert_eq!(fitted.width, 40);
        assert_eq!(fitted.x, 10);
    }

    #[test]
    fn test_half_blocks_carry_two_rows() {
        let mut image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 255]));
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([255, 0, 0]));
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        render_half_blocks(&image, area, &mut buf);

        let cell = &buf.content()[0];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_render_without_preview_shows_placeholder() {
        let area = Rect::new(0, 0, 64, PANEL_HEIGHT);
        let mut buf = Buffer::empty(area);
        panel(CaptureState::Idle).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Camera off"));
        assert!(text.contains("test pattern"));
    }
}
