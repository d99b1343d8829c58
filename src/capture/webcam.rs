//! Physical webcams through `nokhwa`.
//!
//! The nokhwa handle is created and driven on a dedicated capture thread;
//! the stream only sees the most recent decoded frame.
//!
//! ```text
//! acquire() ──spawn──▶ capture thread: Camera::new → open_stream → frame() loop
//!     ▲                        │
//!     └── first frame / error ─┘        latest: Arc<Mutex<Option<RgbImage>>>
//! ```
//!
//! Acquisition tries `MAX_CAMERA_ATTEMPTS` consecutive indices starting at
//! the configured one, and stops early on a permission refusal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::RgbImage;
use log::{debug, info, warn};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

use super::{Camera, CameraError, DeviceLease, LeaseGuard, VideoStream};

pub const MAX_CAMERA_ATTEMPTS: u32 = 3;
const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);
const FRAME_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Splits backend failures into permission refusals and everything else.
/// Backends only report text, so this goes by the message.
pub fn classify_open_error(index: u32, message: &str) -> CameraError {
    let lower = message.to_lowercase();
    let refused = ["permission", "denied", "not authorized", "unauthorized"]
        .iter()
        .any(|needle| lower.contains(needle));
    let detail = format!("camera {index}: {message}");
    if refused {
        CameraError::PermissionDenied(detail)
    } else {
        CameraError::DeviceUnavailable(detail)
    }
}

pub struct WebcamCamera {
    first_index: u32,
    name: String,
    lease: DeviceLease,
}

impl WebcamCamera {
    pub fn new(first_index: u32) -> Self {
        Self {
            first_index,
            name: format!("webcam {first_index}"),
            lease: DeviceLease::new(),
        }
    }

    /// Indices tried on acquire, in order.
    pub fn candidate_indices(&self) -> impl Iterator<Item = u32> {
        let first = self.first_index;
        (0..MAX_CAMERA_ATTEMPTS).filter_map(move |offset| first.checked_add(offset))
    }
}

impl Camera for WebcamCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        let guard = self.lease.claim().ok_or_else(|| {
            CameraError::DeviceUnavailable(format!("{} already in use", self.name))
        })?;

        let mut last_error = None;
        for index in self.candidate_indices() {
            match CaptureWorker::start(index) {
                Ok(worker) => {
                    info!("Acquired webcam at index {}", index);
                    return Ok(Box::new(WebcamStream { guard, worker }));
                }
                Err(e @ CameraError::PermissionDenied(_)) => {
                    warn!("Webcam access refused: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Webcam index {} unavailable: {}", index, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CameraError::DeviceUnavailable(format!("{}: no camera indices to try", self.name))
        }))
    }
}

// ============================================================================
// Capture thread
// ============================================================================

struct CaptureWorker {
    latest: Arc<Mutex<Option<RgbImage>>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Spawns the capture thread and waits for its first frame.
    fn start(index: u32) -> Result<Self, CameraError> {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let latest = Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let latest = latest.clone();
            let running = running.clone();
            thread::Builder::new()
                .name(format!("webcam-{index}"))
                .spawn(move || capture_loop(index, ready_tx, latest, running))
                .map_err(|e| CameraError::DeviceUnavailable(format!("camera {index}: {e}")))?
        };

        let mut worker = Self {
            latest,
            running,
            handle: Some(handle),
        };

        match ready_rx.recv_timeout(FIRST_FRAME_TIMEOUT) {
            Ok(Ok(())) => Ok(worker),
            Ok(Err(e)) => {
                worker.stop();
                Err(e)
            }
            Err(_) => {
                worker.stop();
                Err(CameraError::DeviceUnavailable(format!(
                    "camera {index}: no frame within {FIRST_FRAME_TIMEOUT:?}"
                )))
            }
        }
    }

    fn latest(&self) -> Option<RgbImage> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Webcam capture thread panicked");
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(
    index: u32,
    ready: SyncSender<Result<(), CameraError>>,
    latest: Arc<Mutex<Option<RgbImage>>>,
    running: Arc<AtomicBool>,
) {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = match nokhwa::Camera::new(CameraIndex::Index(index), requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(classify_open_error(index, &e.to_string())));
            return;
        }
    };
    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(classify_open_error(index, &e.to_string())));
        return;
    }

    let mut announced = false;
    while running.load(Ordering::Acquire) {
        let decoded = camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>());
        match decoded {
            Ok(decoded) => {
                let (width, height) = decoded.dimensions();
                let Some(frame) = RgbImage::from_raw(width, height, decoded.into_raw()) else {
                    warn!("Webcam frame {}x{} had the wrong size", width, height);
                    continue;
                };
                if let Ok(mut slot) = latest.lock() {
                    *slot = Some(frame);
                }
                if !announced {
                    announced = true;
                    debug!("First webcam frame {}x{} from index {}", width, height, index);
                    let _ = ready.send(Ok(()));
                }
            }
            Err(e) if !announced => {
                let _ = ready.send(Err(classify_open_error(index, &e.to_string())));
                break;
            }
            Err(e) => {
                warn!("Dropped webcam frame: {}", e);
                thread::sleep(FRAME_RETRY_DELAY);
            }
        }
    }

    if let Err(e) = camera.stop_stream() {
        debug!("Webcam stop_stream failed: {}", e);
    }
    info!("Webcam capture thread for index {} finished", index);
}

// ============================================================================
// Stream
// ============================================================================

struct WebcamStream {
    guard: LeaseGuard,
    worker: CaptureWorker,
}

impl VideoStream for WebcamStream {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        if !self.guard.is_held() {
            return Err(CameraError::Stopped);
        }
        self.worker
            .latest()
            .ok_or_else(|| CameraError::Frame("no webcam frame yet".into()))
    }

    fn stop(&mut self) {
        self.worker.stop();
        if self.guard.release() {
            info!("Released webcam");
        }
    }

    fn is_live(&self) -> bool {
        self.guard.is_held()
    }
}

impl Drop for WebcamStream {
    fn drop(&mut self) {
        self.stop();
    }
}
