//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the kiosk
//! screen, and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background Work
//!
//! Analysis requests and the emotion poller run on tokio tasks. They never
//! touch `App` directly; results come back as `Action`s over an mpsc channel
//! and go through `update()` like everything else.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (camera live or analysis in flight): draws every ~80ms so
//!   the preview keeps moving.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   actions, or terminal resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use image::RgbImage;
use tui_scrollview::ScrollViewState;

use crate::Mode;
use crate::analysis::{EmotionPoller, EmotionService};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::flow::{CapturePayload, CaptureState};
use crate::core::state::App;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::BodyLayout;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub scroll_state: ScrollViewState,
    /// Card selected with Tab / Shift+Tab.
    pub focused_card: Option<usize>,
    /// Card under the mouse pointer.
    pub hovered_card: Option<usize>,
    // Cached from the last draw, for hit testing
    pub body_area: ratatui::layout::Rect,
    pub layout: BodyLayout,
    /// Last mirrored camera frame; frozen while the snapshot is analyzed.
    pub last_preview: Option<RgbImage>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            focused_card: None,
            hovered_card: None,
            body_area: ratatui::layout::Rect::default(),
            layout: BodyLayout::default(),
            last_preview: None,
        }
    }

    /// Hover wins over keyboard focus.
    pub fn expanded_card(&self) -> Option<usize> {
        self.hovered_card.or(self.focused_card)
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Next focus index when cycling through `count` cards.
fn cycle_focus(current: Option<usize>, count: usize, forward: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1) % count,
        (Some(i), false) => (i + count - 1) % count,
    })
}

/// Keeps `tui.last_preview` in step with the capture flow.
fn sync_preview(app: &mut App, tui: &mut TuiState) {
    let Some(flow) = app.flow.as_mut() else {
        return;
    };
    match flow.state() {
        CaptureState::CameraActive => {
            if let Some(frame) = flow.preview() {
                tui.last_preview = Some(frame);
            }
        }
        CaptureState::Capturing | CaptureState::Analyzed => {}
        CaptureState::Idle | CaptureState::Error => tui.last_preview = None,
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let poller = match app.mode {
        Mode::Poll => Some(spawn_poller(&app, tx.clone())),
        Mode::Capture => {
            // First screen asks for the camera straight away
            let _ = tx.send(Action::StartCamera);
            None
        }
    };

    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.flow.as_ref().is_some_and(|f| {
            matches!(
                f.state(),
                CaptureState::CameraActive | CaptureState::Capturing
            )
        });
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            sync_preview(&mut app, &mut tui);
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut should_quit = handle_events(
            &mut app,
            &mut tui,
            first_event
                .into_iter()
                .chain(std::iter::from_fn(poll_event_immediate)),
            &tx,
        );

        if should_quit {
            break;
        }

        // Handle background task actions (analysis results, poll updates)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }
    }

    if let Some(poller) = poller {
        poller.cancel();
    }
    if let Some(flow) = app.flow.as_mut() {
        flow.release();
    }

    ratatui::restore();
    Ok(())
}

/// Applies a batch of input events. Stops at the first event that quits,
/// leaving the rest unread. Returns true when the loop should exit.
fn handle_events(
    app: &mut App,
    tui: &mut TuiState,
    events: impl IntoIterator<Item = TuiEvent>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    for event in events {
        let quit = match event {
            TuiEvent::Resize => false,
            TuiEvent::Quit => dispatch(app, Action::Quit, tx),
            TuiEvent::Capture => {
                let idle = app
                    .flow
                    .as_ref()
                    .is_some_and(|f| f.state() == CaptureState::Idle);
                let action = if idle {
                    Action::StartCamera
                } else {
                    Action::Capture
                };
                dispatch(app, action, tx)
            }
            TuiEvent::Retake => dispatch(app, Action::Retake, tx),
            TuiEvent::FocusNext | TuiEvent::FocusPrev => {
                let count = app.recommendations().len();
                tui.focused_card =
                    cycle_focus(tui.focused_card, count, event == TuiEvent::FocusNext);
                false
            }
            TuiEvent::ScrollUp => {
                tui.scroll_state.scroll_up();
                false
            }
            TuiEvent::ScrollDown => {
                tui.scroll_state.scroll_down();
                false
            }
            TuiEvent::ScrollPageUp => {
                tui.scroll_state.scroll_page_up();
                false
            }
            TuiEvent::ScrollPageDown => {
                tui.scroll_state.scroll_page_down();
                false
            }
            TuiEvent::MouseMove(_col, row) => {
                tui.hovered_card = ui::hit_test_card(
                    row,
                    tui.body_area,
                    tui.scroll_state.offset().y,
                    &tui.layout,
                );
                false
            }
        };
        if quit {
            return true;
        }
    }
    false
}

/// Runs `action` through `update()` and carries out the effect.
/// Returns true when the loop should exit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::SpawnAnalysis(payload) => {
            spawn_analysis(app.service.clone(), payload, tx.clone());
            false
        }
        Effect::None => false,
    }
}

fn spawn_analysis(
    service: Arc<dyn EmotionService>,
    payload: CapturePayload,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning analysis request via {} (attempt {}, {} jpeg bytes)",
        service.name(),
        payload.generation,
        payload.frame.jpeg_len
    );
    tokio::spawn(async move {
        let result = service.analyze(&payload.frame.data_url).await;
        if let Err(e) = &result {
            warn!("Analysis attempt {} failed: {}", payload.generation, e);
        }
        if tx
            .send(Action::AnalysisFinished {
                generation: payload.generation,
                result,
            })
            .is_err()
        {
            warn!(
                "Failed to send analysis result for attempt {}: receiver dropped",
                payload.generation
            );
        }
    });
}

fn spawn_poller(app: &App, tx: mpsc::Sender<Action>) -> EmotionPoller {
    info!(
        "Starting emotion poller via {} every {:?}",
        app.service.name(),
        app.poll_interval
    );
    EmotionPoller::spawn(app.service.clone(), app.poll_interval, move |update| {
        tx.send(Action::PollUpdated(update)).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion::EmotionLabel;
    use crate::test_support::{ScriptedService, test_app};

    #[test]
    fn test_cycle_focus_wraps() {
        assert_eq!(cycle_focus(None, 2, true), Some(0));
        assert_eq!(cycle_focus(Some(0), 2, true), Some(1));
        assert_eq!(cycle_focus(Some(1), 2, true), Some(0));
        assert_eq!(cycle_focus(None, 2, false), Some(1));
        assert_eq!(cycle_focus(Some(0), 2, false), Some(1));
        assert_eq!(cycle_focus(None, 0, true), None);
    }

    #[test]
    fn test_hover_wins_over_focus() {
        let mut tui = TuiState::new();
        tui.focused_card = Some(0);
        assert_eq!(tui.expanded_card(), Some(0));
        tui.hovered_card = Some(1);
        assert_eq!(tui.expanded_card(), Some(1));
    }

    #[test]
    fn test_sync_preview_tracks_flow() {
        let (mut app, _monitor) = test_app(Arc::new(ScriptedService::default()));
        let mut tui = TuiState::new();

        sync_preview(&mut app, &mut tui);
        assert!(tui.last_preview.is_none());

        update(&mut app, Action::StartCamera);
        sync_preview(&mut app, &mut tui);
        assert!(tui.last_preview.is_some());

        update(&mut app, Action::Quit);
        sync_preview(&mut app, &mut tui);
        assert!(tui.last_preview.is_none());
    }

    #[test]
    fn test_quit_stops_the_event_batch() {
        let (mut app, monitor) = test_app(Arc::new(ScriptedService::default()));
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();

        assert!(!handle_events(&mut app, &mut tui, [TuiEvent::Capture], &tx));
        assert_eq!(monitor.acquire_calls(), 1);

        let quit = handle_events(
            &mut app,
            &mut tui,
            [TuiEvent::Quit, TuiEvent::Capture, TuiEvent::FocusNext],
            &tx,
        );
        assert!(quit);
        assert_eq!(app.flow.as_ref().map(|f| f.state()), Some(CaptureState::Idle));
        assert_eq!(monitor.acquire_calls(), 1);
        assert!(!monitor.device_in_use());
        assert_eq!(tui.focused_card, None);
    }

    #[test]
    fn test_space_turns_the_camera_on() {
        let (mut app, monitor) = test_app(Arc::new(ScriptedService::default()));
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();

        handle_events(&mut app, &mut tui, [TuiEvent::Capture], &tx);
        assert_eq!(
            app.flow.as_ref().map(|f| f.state()),
            Some(CaptureState::CameraActive)
        );
        assert!(monitor.device_in_use());
    }

    #[tokio::test]
    async fn test_dispatch_capture_spawns_analysis() {
        let service = Arc::new(ScriptedService::analyzing(vec![Ok(EmotionLabel::Happy)]));
        let (mut app, _monitor) = test_app(service.clone());
        let (tx, rx) = mpsc::channel();

        assert!(!dispatch(&mut app, Action::StartCamera, &tx));
        assert!(!dispatch(&mut app, Action::Capture, &tx));

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            action,
            Action::AnalysisFinished {
                generation: 1,
                result: Ok(EmotionLabel::Happy)
            }
        ));

        dispatch(&mut app, action, &tx);
        assert_eq!(app.current_label(), EmotionLabel::Happy);
        assert_eq!(service.analyze_calls(), 1);
        assert!(dispatch(&mut app, Action::Quit, &tx));
    }
}
