//! # Application State
//!
//! Core business state for the kiosk. Domain logic only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── mode: Mode                           // capture or poll
//! ├── service: Arc<dyn EmotionService>     // analysis backend
//! ├── flow: Option<CaptureFlow>            // capture mode only
//! ├── polled_label: EmotionLabel           // poll mode only
//! ├── connected: Option<bool>              // last poll outcome (None = not yet)
//! ├── last_update: Option<DateTime<Local>> // time of last poll
//! ├── poll_interval: Duration
//! └── status_message: String               // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::Mode;
use crate::analysis::{EmotionService, HttpEmotionService};
use crate::capture::{Camera, open_camera};
use crate::core::catalog::{RecommendationEntry, recommendations_for};
use crate::core::config::ResolvedConfig;
use crate::core::emotion::EmotionLabel;
use crate::core::flow::CaptureFlow;

pub struct App {
    pub mode: Mode,
    pub service: Arc<dyn EmotionService>,
    pub flow: Option<CaptureFlow>,
    pub polled_label: EmotionLabel,
    pub connected: Option<bool>,
    pub last_update: Option<DateTime<Local>>,
    pub poll_interval: Duration,
    pub status_message: String,
}

impl App {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let service: Arc<dyn EmotionService> =
            Arc::new(HttpEmotionService::new(config.service_url.clone()));
        match config.mode {
            Mode::Capture => Self::with_camera(
                service,
                open_camera(&config.camera_source),
                config.jpeg_quality,
            ),
            Mode::Poll => Self::polling(service, config.poll_interval),
        }
    }

    /// Capture mode around the given camera.
    pub fn with_camera(
        service: Arc<dyn EmotionService>,
        camera: Box<dyn Camera>,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            mode: Mode::Capture,
            service,
            flow: Some(CaptureFlow::new(camera, jpeg_quality)),
            polled_label: EmotionLabel::default(),
            connected: None,
            last_update: None,
            poll_interval: Duration::ZERO,
            status_message: String::from("Welcome to Sunbucks!"),
        }
    }

    pub fn polling(service: Arc<dyn EmotionService>, poll_interval: Duration) -> Self {
        Self {
            mode: Mode::Poll,
            service,
            flow: None,
            polled_label: EmotionLabel::default(),
            connected: None,
            last_update: None,
            poll_interval,
            status_message: String::from("Connecting..."),
        }
    }

    pub fn current_label(&self) -> EmotionLabel {
        match &self.flow {
            Some(flow) => flow.current_label(),
            None => self.polled_label,
        }
    }

    pub fn headline(&self) -> String {
        format!("You look {}.", self.current_label().display_name())
    }

    pub fn recommendations(&self) -> &'static [RecommendationEntry] {
        recommendations_for(self.current_label())
    }
}
