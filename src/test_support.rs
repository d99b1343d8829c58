//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgb, RgbImage};

use crate::analysis::{AnalysisError, EmotionService};
use crate::capture::{Camera, CameraError, DeviceLease, LeaseGuard, VideoStream};
use crate::core::emotion::EmotionLabel;

// ============================================================================
// Camera
// ============================================================================

/// Observes a single stream handed out by [`FakeCamera`].
#[derive(Clone)]
pub struct StreamHandle {
    live: Arc<AtomicBool>,
}

impl StreamHandle {
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Same contract as `VideoStream::read_frame`.
    pub fn read_frame(&self) -> Result<RgbImage, CameraError> {
        if self.is_live() {
            Ok(fake_frame())
        } else {
            Err(CameraError::Stopped)
        }
    }
}

/// Shared view into a [`FakeCamera`] after it has been boxed into a flow.
#[derive(Clone, Default)]
pub struct CameraMonitor {
    lease: DeviceLease,
    acquire_calls: Arc<AtomicUsize>,
    streams: Arc<Mutex<Vec<StreamHandle>>>,
}

impl CameraMonitor {
    pub fn acquire_calls(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    pub fn device_in_use(&self) -> bool {
        self.lease.is_claimed()
    }

    pub fn live_streams(&self) -> usize {
        self.streams
            .lock()
            .map(|s| s.iter().filter(|h| h.is_live()).count())
            .unwrap_or(0)
    }

    pub fn last_stream(&self) -> Option<StreamHandle> {
        self.streams.lock().ok()?.last().cloned()
    }
}

/// 16x8 frame, white in the leftmost column, dark green elsewhere.
pub fn fake_frame() -> RgbImage {
    RgbImage::from_fn(16, 8, |x, _| {
        if x == 0 { Rgb([255, 255, 255]) } else { Rgb([30, 57, 50]) }
    })
}

pub struct FakeCamera {
    monitor: CameraMonitor,
    failures: VecDeque<CameraError>,
    fail_forever: Option<CameraError>,
    broken_frames: bool,
}

impl Default for FakeCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            monitor: CameraMonitor::default(),
            failures: VecDeque::new(),
            fail_forever: None,
            broken_frames: false,
        }
    }

    /// Every acquire fails with `error`.
    pub fn failing(error: CameraError) -> Self {
        Self {
            fail_forever: Some(error),
            ..Self::new()
        }
    }

    /// First acquire fails with `error`, later ones succeed.
    pub fn failing_once(error: CameraError) -> Self {
        Self {
            failures: VecDeque::from([error]),
            ..Self::new()
        }
    }

    /// Streams that can't produce frames.
    pub fn with_broken_frames() -> Self {
        Self {
            broken_frames: true,
            ..Self::new()
        }
    }

    pub fn monitor(&self) -> CameraMonitor {
        self.monitor.clone()
    }
}

impl Camera for FakeCamera {
    fn name(&self) -> &str {
        "fake"
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        self.monitor.acquire_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.pop_front() {
            return Err(error);
        }
        if let Some(error) = &self.fail_forever {
            return Err(error.clone());
        }
        let guard = self
            .monitor
            .lease
            .claim()
            .ok_or_else(|| CameraError::DeviceUnavailable("fake camera busy".into()))?;

        let handle = StreamHandle {
            live: Arc::new(AtomicBool::new(true)),
        };
        if let Ok(mut streams) = self.monitor.streams.lock() {
            streams.push(handle.clone());
        }
        Ok(Box::new(FakeStream {
            guard,
            handle,
            broken: self.broken_frames,
        }))
    }
}

struct FakeStream {
    guard: LeaseGuard,
    handle: StreamHandle,
    broken: bool,
}

impl VideoStream for FakeStream {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        if self.broken && self.handle.is_live() {
            return Err(CameraError::Frame("sensor glitch".into()));
        }
        self.handle.read_frame()
    }

    fn stop(&mut self) {
        self.handle.live.store(false, Ordering::Release);
        self.guard.release();
    }

    fn is_live(&self) -> bool {
        self.handle.is_live()
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Emotion service
// ============================================================================

type Script = Mutex<VecDeque<Result<EmotionLabel, AnalysisError>>>;

/// Replays scripted results. Once a script runs dry it answers Calm.
#[derive(Default)]
pub struct ScriptedService {
    analyze_script: Script,
    poll_script: Script,
    analyze_calls: AtomicUsize,
    poll_calls: AtomicUsize,
    last_image: Mutex<Option<String>>,
}

impl ScriptedService {
    pub fn analyzing(results: Vec<Result<EmotionLabel, AnalysisError>>) -> Self {
        Self {
            analyze_script: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn polling(results: Vec<Result<EmotionLabel, AnalysisError>>) -> Self {
        Self {
            poll_script: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn last_image(&self) -> Option<String> {
        self.last_image.lock().ok()?.clone()
    }

    fn next(script: &Script) -> Result<EmotionLabel, AnalysisError> {
        script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or(Ok(EmotionLabel::Calm))
    }
}

#[async_trait]
impl EmotionService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, image_data_url: &str) -> Result<EmotionLabel, AnalysisError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_image.lock() {
            *last = Some(image_data_url.to_string());
        }
        Self::next(&self.analyze_script)
    }

    async fn current_emotion(&self) -> Result<EmotionLabel, AnalysisError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.poll_script)
    }
}

/// Creates a capture-mode App around a FakeCamera and a ScriptedService.
pub fn test_app(service: Arc<ScriptedService>) -> (crate::core::state::App, CameraMonitor) {
    let camera = FakeCamera::new();
    let monitor = camera.monitor();
    let app = crate::core::state::App::with_camera(service, Box::new(camera), 90);
    (app, monitor)
}
