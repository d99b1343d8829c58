//! # Capture Flow
//!
//! The camera → photo → analysis → recommendations lifecycle.
//!
//! ```text
//!            acquire_camera()           capture_frame()
//!   Idle ───────────────────▶ CameraActive ───────────▶ Capturing
//!    │ failure                    ▲                     │       │
//!    ▼                            │ retake()            │ ok    │ failure
//!  Error ◀────────────────────────┼─────────────────────┼───────┘
//!    │                            │                     ▼
//!    └──────── retake() ──────────┴─────────────── Analyzed
//! ```
//!
//! Enter/exit actions own the camera:
//! - entering `CameraActive` acquires a stream (any previous one is released first);
//! - entering `Analyzed`, `Error` or `Idle` releases it.
//!
//! Analysis can run in-line ([`CaptureFlow::submit_for_analysis`]) or on a
//! separate task: [`CaptureFlow::capture_frame`] hands out a payload tagged
//! with the session generation, and [`CaptureFlow::complete_analysis`] applies
//! the result only if that generation is still current.

use std::fmt;

use image::RgbImage;
use log::{debug, info, warn};

use crate::analysis::{AnalysisError, EmotionService};
use crate::capture::encode::{self, EncodedFrame};
use crate::capture::{Camera, CameraError, VideoStream};
use crate::core::emotion::EmotionLabel;

/// Shown for every analysis failure.
pub const GENERIC_RETRY_MESSAGE: &str =
    "We couldn't read your mood this time. Press r to retake your photo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Camera not requested yet.
    Idle,
    /// Stream acquired, live preview.
    CameraActive,
    /// Frame encoded and submitted; waiting on the service.
    Capturing,
    /// Result received.
    Analyzed,
    /// Last attempt failed; waiting for a retake.
    Error,
}

/// Failures of the capture flow.
///
/// The first five kinds put the flow into [`CaptureState::Error`].
/// `NotReady` rejects a call without touching state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    PermissionDenied(String),
    DeviceUnavailable(String),
    EncodingFailure(String),
    TransportFailure(String),
    MalformedResponse(String),
    NotReady {
        operation: &'static str,
        state: CaptureState,
    },
}

impl FlowError {
    /// Text for the customer. Details stay in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            FlowError::PermissionDenied(_) => {
                "Camera access was denied. Allow camera access, then press r to try again."
            }
            FlowError::DeviceUnavailable(_) => {
                "No camera is available. Connect one, then press r to try again."
            }
            FlowError::EncodingFailure(_) => {
                "We couldn't take your photo. Press r to try again."
            }
            FlowError::TransportFailure(_) | FlowError::MalformedResponse(_) => {
                GENERIC_RETRY_MESSAGE
            }
            FlowError::NotReady { .. } => "Please wait...",
        }
    }

    pub fn is_camera_error(&self) -> bool {
        matches!(
            self,
            FlowError::PermissionDenied(_) | FlowError::DeviceUnavailable(_)
        )
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            FlowError::DeviceUnavailable(msg) => write!(f, "device unavailable: {msg}"),
            FlowError::EncodingFailure(msg) => write!(f, "encoding failure: {msg}"),
            FlowError::TransportFailure(msg) => write!(f, "transport failure: {msg}"),
            FlowError::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            FlowError::NotReady { operation, state } => {
                write!(f, "{operation} not allowed while {state:?}")
            }
        }
    }
}

impl std::error::Error for FlowError {}

impl From<CameraError> for FlowError {
    fn from(e: CameraError) -> Self {
        match e {
            CameraError::PermissionDenied(msg) => FlowError::PermissionDenied(msg),
            CameraError::DeviceUnavailable(msg) => FlowError::DeviceUnavailable(msg),
            CameraError::Stopped => FlowError::EncodingFailure(e.to_string()),
            CameraError::Frame(msg) => FlowError::EncodingFailure(msg),
        }
    }
}

impl From<AnalysisError> for FlowError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Malformed(msg) => FlowError::MalformedResponse(msg),
            other => FlowError::TransportFailure(other.to_string()),
        }
    }
}

/// An encoded still bound to the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePayload {
    pub generation: u64,
    pub frame: EncodedFrame,
}

/// What [`CaptureFlow::complete_analysis`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Analyzed(EmotionLabel),
    Failed(FlowError),
    /// Result belonged to an abandoned attempt and was dropped.
    Stale,
}

/// Transient state of one flow instance. Owns the camera stream.
struct CaptureSession {
    stream: Option<Box<dyn VideoStream>>,
    state: CaptureState,
    error: Option<FlowError>,
    label: Option<EmotionLabel>,
    generation: u64,
}

pub struct CaptureFlow {
    camera: Box<dyn Camera>,
    jpeg_quality: u8,
    session: CaptureSession,
}

impl CaptureFlow {
    pub fn new(camera: Box<dyn Camera>, jpeg_quality: u8) -> Self {
        Self {
            camera,
            jpeg_quality,
            session: CaptureSession {
                stream: None,
                state: CaptureState::Idle,
                error: None,
                label: None,
                generation: 0,
            },
        }
    }

    pub fn state(&self) -> CaptureState {
        self.session.state
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.session.error.as_ref()
    }

    /// Stored label, if an analysis succeeded since the last retake.
    pub fn stored_label(&self) -> Option<EmotionLabel> {
        self.session.label
    }

    /// Label to display: the stored one, or Calm.
    pub fn current_label(&self) -> EmotionLabel {
        self.session.label.unwrap_or_default()
    }

    pub fn generation(&self) -> u64 {
        self.session.generation
    }

    pub fn camera_name(&self) -> &str {
        self.camera.name()
    }

    pub fn has_stream(&self) -> bool {
        self.session.stream.is_some()
    }

    /// Capture control is enabled only with a live preview.
    pub fn can_capture(&self) -> bool {
        self.session.state == CaptureState::CameraActive && self.session.stream.is_some()
    }

    pub fn can_retake(&self) -> bool {
        matches!(
            self.session.state,
            CaptureState::Analyzed | CaptureState::Error
        )
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.session.stream.take() {
            stream.stop();
            debug!("Camera stream released");
        }
    }

    /// Single place where state changes, so exit actions always run.
    fn transition(&mut self, next: CaptureState) {
        let prev = self.session.state;
        if matches!(
            next,
            CaptureState::Idle | CaptureState::Analyzed | CaptureState::Error
        ) {
            self.release_stream();
        }
        self.session.state = next;
        if prev != next {
            info!("Capture flow: {:?} -> {:?}", prev, next);
        }
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        warn!("Capture flow error: {}", error);
        self.session.error = Some(error.clone());
        self.transition(CaptureState::Error);
        error
    }

    fn not_ready(&self, operation: &'static str) -> FlowError {
        debug!("Rejected {} in {:?}", operation, self.session.state);
        FlowError::NotReady {
            operation,
            state: self.session.state,
        }
    }

    /// Requests the camera. On success the flow is `CameraActive`.
    ///
    /// Any stream still held is released first. On failure nothing is stored
    /// and the flow is in `Error`.
    pub fn acquire_camera(&mut self) -> Result<(), FlowError> {
        if self.session.state == CaptureState::Capturing {
            return Err(self.not_ready("acquire_camera"));
        }
        self.release_stream();

        match self.camera.acquire() {
            Ok(stream) => {
                self.session.stream = Some(stream);
                self.session.error = None;
                self.transition(CaptureState::CameraActive);
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Current frame, mirrored for display. `None` without a live stream.
    pub fn preview(&mut self) -> Option<RgbImage> {
        if self.session.state != CaptureState::CameraActive {
            return None;
        }
        let stream = self.session.stream.as_mut()?;
        match stream.read_frame() {
            Ok(frame) => Some(encode::mirror(&frame)),
            Err(e) => {
                debug!("Preview frame unavailable: {}", e);
                None
            }
        }
    }

    /// Grabs and encodes the current frame, moving to `Capturing`.
    ///
    /// Capture and encode succeed together or the flow goes to `Error`
    /// without producing a payload.
    pub fn capture_frame(&mut self) -> Result<CapturePayload, FlowError> {
        if !self.can_capture() {
            return Err(self.not_ready("capture_frame"));
        }

        let frame = match self.session.stream.as_mut().map(|s| s.read_frame()) {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => return Err(self.fail(e.into())),
            None => return Err(self.not_ready("capture_frame")),
        };

        let encoded = match encode::encode_mirrored(&frame, self.jpeg_quality) {
            Ok(encoded) => encoded,
            Err(e) => return Err(self.fail(FlowError::EncodingFailure(e.to_string()))),
        };

        self.session.generation += 1;
        self.transition(CaptureState::Capturing);
        info!(
            "Captured frame {}x{} (attempt {})",
            encoded.width, encoded.height, self.session.generation
        );

        Ok(CapturePayload {
            generation: self.session.generation,
            frame: encoded,
        })
    }

    /// Applies an analysis result for the attempt `generation`.
    ///
    /// Results for any other attempt, or arriving outside `Capturing`, are
    /// ignored. On failure the stored label is left untouched.
    pub fn complete_analysis(
        &mut self,
        generation: u64,
        result: Result<EmotionLabel, AnalysisError>,
    ) -> Completion {
        if generation != self.session.generation
            || self.session.state != CaptureState::Capturing
        {
            info!(
                "Ignoring analysis result for attempt {} (current {}, {:?})",
                generation, self.session.generation, self.session.state
            );
            return Completion::Stale;
        }

        match result {
            Ok(label) => {
                self.session.label = Some(label);
                self.session.error = None;
                self.transition(CaptureState::Analyzed);
                Completion::Analyzed(label)
            }
            Err(e) => Completion::Failed(self.fail(e.into())),
        }
    }

    /// Sends `payload` to `service` and applies the answer.
    pub async fn submit_for_analysis(
        &mut self,
        payload: CapturePayload,
        service: &dyn EmotionService,
    ) -> Result<EmotionLabel, FlowError> {
        if self.session.state != CaptureState::Capturing {
            return Err(self.not_ready("submit_for_analysis"));
        }
        let result = service.analyze(&payload.frame.data_url).await;
        match self.complete_analysis(payload.generation, result) {
            Completion::Analyzed(label) => Ok(label),
            Completion::Failed(e) => Err(e),
            Completion::Stale => Err(self.not_ready("submit_for_analysis")),
        }
    }

    /// Clears the last result or error and asks for the camera again.
    pub fn retake(&mut self) -> Result<(), FlowError> {
        if !self.can_retake() {
            return Err(self.not_ready("retake"));
        }
        self.session.label = None;
        self.session.error = None;
        self.acquire_camera()
    }

    /// Releases the camera and returns to `Idle`. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.transition(CaptureState::Idle);
    }
}

impl Drop for CaptureFlow {
    fn drop(&mut self) {
        self.release_stream();
    }
}
