use crate::Mode;
use crate::core::catalog::MENU_ITEMS;
use crate::core::flow::CaptureState;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CameraPanel, MediaDisplay, StaticCatalog, TitleBar, palette};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tui_scrollview::{ScrollView, ScrollbarVisibility};

const HERO_HEIGHT: u16 = 6;
const CARD_GAP: u16 = 1;
const SECTION_GAP: u16 = 2;
const CARD_MARGIN: u16 = 2;

/// Vertical positions of everything in the scroll body, in content
/// coordinates. Computed before rendering so hit testing can reuse it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyLayout {
    /// `(y, height)` per recommendation card.
    pub cards: Vec<(u16, u16)>,
    pub camera: Option<(u16, u16)>,
    pub catalog: (u16, u16),
    pub total_height: u16,
}

impl BodyLayout {
    pub fn compute(app: &App, expanded: Option<usize>, width: u16) -> Self {
        let card_width = width.saturating_sub(CARD_MARGIN * 2);
        let mut y = HERO_HEIGHT;

        let mut cards = Vec::new();
        for (index, entry) in app.recommendations().iter().enumerate() {
            let height = MediaDisplay::calculate_height(entry, card_width, expanded == Some(index));
            cards.push((y, height));
            y += height + CARD_GAP;
        }

        let camera = if app.mode == Mode::Capture {
            y += SECTION_GAP;
            let height = CameraPanel::calculate_height();
            let region = (y, height);
            y += height;
            Some(region)
        } else {
            None
        };

        y += SECTION_GAP;
        // Heading row above the grid
        y += 1;
        let catalog_height = StaticCatalog::calculate_height(MENU_ITEMS, width);
        let catalog = (y, catalog_height);
        y += catalog_height;

        Self {
            cards,
            camera,
            catalog,
            total_height: y,
        }
    }

    /// Card index under content row `content_y`.
    pub fn card_at(&self, content_y: u16) -> Option<usize> {
        self.cards
            .iter()
            .position(|&(y, height)| content_y >= y && content_y < y + height)
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [title_area, body_area] = layout.areas(frame.area());

    TitleBar::new(app.mode, app.status_message.clone(), app.connected).render(frame, title_area);

    draw_body(frame, body_area, app, tui);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let content_width = area.width.saturating_sub(1);
    let expanded = tui.expanded_card();
    let body = BodyLayout::compute(app, expanded, content_width);

    let mut scroll_view = ScrollView::new(Size::new(content_width, body.total_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    scroll_view.render_widget(
        Block::default().style(Style::default().bg(palette::LIGHT_GREEN)),
        Rect::new(0, 0, content_width, body.total_height),
    );

    scroll_view.render_widget(hero(app), Rect::new(0, 0, content_width, HERO_HEIGHT));

    let card_width = content_width.saturating_sub(CARD_MARGIN * 2);
    for (index, (entry, &(y, height))) in app
        .recommendations()
        .iter()
        .zip(&body.cards)
        .enumerate()
    {
        scroll_view.render_widget(
            MediaDisplay::new(entry, expanded == Some(index)),
            Rect::new(CARD_MARGIN, y, card_width, height),
        );
    }

    if let (Some((y, height)), Some(flow)) = (body.camera, app.flow.as_ref()) {
        scroll_view.render_widget(
            CameraPanel {
                state: flow.state(),
                error: flow.error(),
                preview: tui.last_preview.as_ref(),
                camera_name: flow.camera_name(),
            },
            Rect::new(0, y, content_width, height),
        );
    }

    let (catalog_y, catalog_height) = body.catalog;
    scroll_view.render_widget(
        Paragraph::new(Span::styled(
            "Our menu",
            Style::default()
                .fg(palette::HEADLINE)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Rect::new(0, catalog_y.saturating_sub(1), content_width, 1),
    );
    scroll_view.render_widget(
        StaticCatalog::new(MENU_ITEMS),
        Rect::new(0, catalog_y, content_width, catalog_height),
    );

    frame.render_stateful_widget(scroll_view, area, &mut tui.scroll_state);

    tui.body_area = area;
    tui.layout = body;
}

fn hero(app: &App) -> Paragraph<'static> {
    let headline = match app.flow.as_ref().map(|f| f.state()) {
        Some(CaptureState::Capturing) => "Reading your mood...".to_string(),
        _ => app.headline(),
    };
    Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(palette::HEADLINE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Sunbucks AI recommends......",
            Style::default()
                .fg(palette::ACCENT)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
    ])
    .alignment(Alignment::Center)
}

/// Hit test: given a screen row, find which recommendation card (if any)
/// is under it.
pub fn hit_test_card(
    screen_y: u16,
    body_area: Rect,
    scroll_offset_y: u16,
    layout: &BodyLayout,
) -> Option<usize> {
    if screen_y < body_area.y || screen_y >= body_area.y + body_area.height {
        return None;
    }
    let content_y = (screen_y - body_area.y) + scroll_offset_y;
    layout.card_at(content_y)
}
