//! # Actions
//!
//! Everything that can happen in the kiosk becomes an `Action`.
//! Customer presses Space? That's `Action::Capture`.
//! Service answers? That's `Action::AnalysisFinished { .. }`.
//!
//! `update()` applies an action to the state and returns an [`Effect`] the
//! adapter must carry out. Network I/O never happens here; camera calls do,
//! because the flow owns the device.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::analysis::{AnalysisError, PollUpdate};
use crate::core::emotion::EmotionLabel;
use crate::core::flow::{CapturePayload, CaptureState, Completion};
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// Turn the camera on (first screen).
    StartCamera,
    Capture,
    Retake,
    AnalysisFinished {
        generation: u64,
        result: Result<EmotionLabel, AnalysisError>,
    },
    PollUpdated(PollUpdate),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Run the analysis request on a background task.
    SpawnAnalysis(CapturePayload),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Quit => {
            if let Some(flow) = app.flow.as_mut() {
                flow.release();
            }
            Effect::Quit
        }
        Action::StartCamera => {
            let Some(flow) = app.flow.as_mut() else {
                return Effect::None;
            };
            if flow.state() != CaptureState::Idle {
                return Effect::None;
            }
            app.status_message = match flow.acquire_camera() {
                Ok(()) => format!("Camera on ({}). Press Space to snap.", flow.camera_name()),
                Err(e) => e.user_message().to_string(),
            };
            Effect::None
        }
        Action::Capture => {
            let Some(flow) = app.flow.as_mut() else {
                return Effect::None;
            };
            if !flow.can_capture() {
                return Effect::None;
            }
            match flow.capture_frame() {
                Ok(payload) => {
                    app.status_message = "Reading your mood...".to_string();
                    Effect::SpawnAnalysis(payload)
                }
                Err(e) => {
                    app.status_message = e.user_message().to_string();
                    Effect::None
                }
            }
        }
        Action::Retake => {
            let Some(flow) = app.flow.as_mut() else {
                return Effect::None;
            };
            if !flow.can_retake() {
                return Effect::None;
            }
            app.status_message = match flow.retake() {
                Ok(()) => "Camera on. Press Space to snap.".to_string(),
                Err(e) => e.user_message().to_string(),
            };
            Effect::None
        }
        Action::AnalysisFinished { generation, result } => {
            let Some(flow) = app.flow.as_mut() else {
                return Effect::None;
            };
            match flow.complete_analysis(generation, result) {
                Completion::Analyzed(label) => {
                    info!("Showing recommendations for {}", label);
                    app.status_message =
                        format!("You look {}! Press r to retake.", label.display_name());
                }
                Completion::Failed(e) => {
                    app.status_message = e.user_message().to_string();
                }
                Completion::Stale => {}
            }
            Effect::None
        }
        Action::PollUpdated(poll) => {
            if let Some(label) = poll.label {
                app.polled_label = label;
            }
            app.connected = Some(poll.connected);
            app.last_update = Some(poll.at);
            app.status_message = if poll.connected {
                format!("Connected · updated {}", poll.at.format("%H:%M:%S"))
            } else {
                "Disconnected · retrying".to_string()
            };
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flow::{FlowError, GENERIC_RETRY_MESSAGE};
    use crate::test_support::{ScriptedService, test_app};
    use chrono::Local;
    use std::sync::Arc;
    use std::time::Duration;

    fn flow_state(app: &App) -> CaptureState {
        app.flow.as_ref().map(|f| f.state()).unwrap()
    }

    #[test]
    fn test_capture_cycle() {
        let (mut app, monitor) = test_app(Arc::new(ScriptedService::default()));

        assert_eq!(update(&mut app, Action::StartCamera), Effect::None);
        assert_eq!(flow_state(&app), CaptureState::CameraActive);

        let effect = update(&mut app, Action::Capture);
        let Effect::SpawnAnalysis(payload) = effect else {
            panic!("expected SpawnAnalysis, got {:?}", effect);
        };
        assert_eq!(flow_state(&app), CaptureState::Capturing);

        // A second press while analyzing does nothing
        assert_eq!(update(&mut app, Action::Capture), Effect::None);

        update(
            &mut app,
            Action::AnalysisFinished {
                generation: payload.generation,
                result: Ok(EmotionLabel::Happy),
            },
        );
        assert_eq!(flow_state(&app), CaptureState::Analyzed);
        assert_eq!(app.headline(), "You look happy.");
        assert_eq!(app.recommendations()[0].title, "Raccoon Cake Pop");
        assert!(!monitor.device_in_use());
    }

    #[test]
    fn test_failed_analysis_shows_generic_message() {
        let (mut app, _monitor) = test_app(Arc::new(ScriptedService::default()));
        update(&mut app, Action::StartCamera);
        let Effect::SpawnAnalysis(payload) = update(&mut app, Action::Capture) else {
            panic!("expected SpawnAnalysis");
        };
        update(
            &mut app,
            Action::AnalysisFinished {
                generation: payload.generation,
                result: Err(AnalysisError::Api {
                    status: 500,
                    message: "boom".into(),
                }),
            },
        );
        assert_eq!(flow_state(&app), CaptureState::Error);
        assert_eq!(app.status_message, GENERIC_RETRY_MESSAGE);
        assert_eq!(app.headline(), "You look calm.");
    }

    #[test]
    fn test_retake_only_after_result() {
        let (mut app, monitor) = test_app(Arc::new(ScriptedService::default()));
        update(&mut app, Action::StartCamera);
        update(&mut app, Action::Retake);
        assert_eq!(monitor.acquire_calls(), 1);

        let Effect::SpawnAnalysis(payload) = update(&mut app, Action::Capture) else {
            panic!("expected SpawnAnalysis");
        };
        update(
            &mut app,
            Action::AnalysisFinished {
                generation: payload.generation,
                result: Ok(EmotionLabel::Anger),
            },
        );
        update(&mut app, Action::Retake);
        assert_eq!(monitor.acquire_calls(), 2);
        assert_eq!(flow_state(&app), CaptureState::CameraActive);
        assert_eq!(app.current_label(), EmotionLabel::Calm);
        assert!(app.flow.as_ref().unwrap().error().is_none());
    }

    #[test]
    fn test_quit_releases_camera() {
        let (mut app, monitor) = test_app(Arc::new(ScriptedService::default()));
        update(&mut app, Action::StartCamera);
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
        assert!(!monitor.device_in_use());
    }

    #[test]
    fn test_poll_failure_keeps_label() {
        let mut app = App::polling(Arc::new(ScriptedService::default()), Duration::from_secs(5));
        update(
            &mut app,
            Action::PollUpdated(PollUpdate {
                label: Some(EmotionLabel::Curious),
                connected: true,
                at: Local::now(),
            }),
        );
        assert_eq!(app.connected, Some(true));
        update(
            &mut app,
            Action::PollUpdated(PollUpdate {
                label: None,
                connected: false,
                at: Local::now(),
            }),
        );
        assert_eq!(app.connected, Some(false));
        assert_eq!(app.current_label(), EmotionLabel::Curious);
        assert_eq!(app.status_message, "Disconnected · retrying");
    }

    #[test]
    fn test_capture_actions_ignored_in_poll_mode() {
        let mut app = App::polling(Arc::new(ScriptedService::default()), Duration::from_secs(5));
        assert_eq!(update(&mut app, Action::StartCamera), Effect::None);
        assert_eq!(update(&mut app, Action::Capture), Effect::None);
        assert_eq!(update(&mut app, Action::Retake), Effect::None);
    }

    #[test]
    fn test_denied_camera_message() {
        use crate::capture::CameraError;
        use crate::test_support::FakeCamera;

        let camera = FakeCamera::failing(CameraError::PermissionDenied("no".into()));
        let mut app = App::with_camera(Arc::new(ScriptedService::default()), Box::new(camera), 90);
        update(&mut app, Action::StartCamera);
        assert_eq!(flow_state(&app), CaptureState::Error);
        assert_eq!(
            app.status_message,
            FlowError::PermissionDenied(String::new()).user_message()
        );
    }
}
