//! # Camera Capture
//!
//! Device abstraction for the capture flow. A [`Camera`] hands out at most one
//! live [`VideoStream`] at a time; the stream yields still frames on demand
//! until it is stopped.
//!
//! ```text
//! Camera ──acquire()──▶ VideoStream ──read_frame()──▶ RgbImage
//!    ▲                       │                           │
//!    └──── lease released ◀──┘ stop() / Drop             ▼
//!                                          encode::encode_mirrored()
//!                                                        │
//!                                                        ▼
//!                                           EncodedFrame (data URL)
//! ```
//!
//! ## Modules
//!
//! - [`devices`]: source selection, synthetic test card, image files
//! - `webcam`: physical cameras via nokhwa (feature `webcam`)
//! - [`encode`]: mirror + JPEG + data URL

pub mod devices;
pub mod encode;
#[cfg(feature = "webcam")]
pub mod webcam;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbImage;

pub use devices::{FileCamera, PatternCamera, open_camera, webcam_index};
pub use encode::{EncodeError, EncodedFrame, encode_mirrored};
#[cfg(feature = "webcam")]
pub use webcam::WebcamCamera;

/// Errors raised by camera devices and their streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The OS refused access to the device.
    PermissionDenied(String),
    /// No device at the configured source, or it is already in use.
    DeviceUnavailable(String),
    /// The stream was stopped; no more frames will be produced.
    Stopped,
    /// A frame could not be read from a live stream.
    Frame(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "camera permission denied: {msg}"),
            CameraError::DeviceUnavailable(msg) => write!(f, "camera unavailable: {msg}"),
            CameraError::Stopped => write!(f, "camera stream already stopped"),
            CameraError::Frame(msg) => write!(f, "frame read failed: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

/// A video input device.
pub trait Camera: Send {
    /// Human-readable device name for logs and the status bar.
    fn name(&self) -> &str;

    /// Requests exclusive access to the device.
    ///
    /// Fails with `DeviceUnavailable` while a previously acquired stream is
    /// still live.
    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// A live stream from an acquired camera.
pub trait VideoStream: Send {
    /// Reads the current frame. Fails with `CameraError::Stopped` once stopped.
    fn read_frame(&mut self) -> Result<RgbImage, CameraError>;

    /// Releases the device. Idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Exclusive-use token shared between a device and the stream it handed out.
///
/// The device holds one [`DeviceLease`] and calls [`DeviceLease::claim`] on
/// acquire; the returned [`LeaseGuard`] lives inside the stream and frees the
/// device when released or dropped.
#[derive(Debug, Default, Clone)]
pub struct DeviceLease {
    in_use: Arc<AtomicBool>,
}

impl DeviceLease {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self) -> Option<LeaseGuard> {
        self.in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LeaseGuard {
                in_use: Some(self.in_use.clone()),
            })
    }

    pub fn is_claimed(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct LeaseGuard {
    in_use: Option<Arc<AtomicBool>>,
}

impl LeaseGuard {
    /// Frees the device. Returns false if it was already released.
    pub fn release(&mut self) -> bool {
        match self.in_use.take() {
            Some(flag) => {
                flag.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.in_use.is_some()
    }
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        self.release();
    }
}
