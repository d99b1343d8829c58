//! Concrete cameras.
//!
//! - `WebcamCamera` (feature `webcam`): a physical device by index. The default.
//! - [`PatternCamera`]: a synthetic animated test card. Always available.
//! - [`FileCamera`]: frames from a still image, or a directory of images
//!   cycled once per second.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{Rgb, RgbImage};
use log::{debug, info, warn};

use super::{Camera, CameraError, DeviceLease, LeaseGuard, VideoStream};

/// Config value selecting the synthetic camera.
pub const PATTERN_SOURCE: &str = "pattern";
/// Default source: the first webcam.
pub const DEFAULT_CAMERA_SOURCE: &str = "0";

const PATTERN_WIDTH: u32 = 160;
const PATTERN_HEIGHT: u32 = 120;
const FILE_FRAME_PERIOD_MS: u128 = 1000;

/// Webcam index named by `source`: a bare number, `/dev/videoN`, or
/// `webcam` / `default` for index 0.
pub fn webcam_index(source: &str) -> Option<u32> {
    let source = source.trim();
    if source.eq_ignore_ascii_case("webcam") || source.eq_ignore_ascii_case("default") {
        return Some(0);
    }
    source
        .strip_prefix("/dev/video")
        .unwrap_or(source)
        .parse()
        .ok()
}

/// Builds the camera named by a config `source` value.
pub fn open_camera(source: &str) -> Box<dyn Camera> {
    if source.eq_ignore_ascii_case(PATTERN_SOURCE) {
        Box::new(PatternCamera::new())
    } else if let Some(index) = webcam_index(source) {
        webcam(index)
    } else {
        Box::new(FileCamera::new(source))
    }
}

#[cfg(feature = "webcam")]
fn webcam(index: u32) -> Box<dyn Camera> {
    Box::new(super::webcam::WebcamCamera::new(index))
}

#[cfg(not(feature = "webcam"))]
fn webcam(index: u32) -> Box<dyn Camera> {
    Box::new(NoWebcam {
        name: format!("webcam {index}"),
    })
}

/// Stand-in when the crate is built without the `webcam` feature.
#[cfg(not(feature = "webcam"))]
struct NoWebcam {
    name: String,
}

#[cfg(not(feature = "webcam"))]
impl Camera for NoWebcam {
    fn name(&self) -> &str {
        &self.name
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        Err(CameraError::DeviceUnavailable(format!(
            "{}: built without webcam support",
            self.name
        )))
    }
}

// ============================================================================
// Synthetic test card
// ============================================================================

pub struct PatternCamera {
    lease: DeviceLease,
}

impl Default for PatternCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCamera {
    pub fn new() -> Self {
        Self {
            lease: DeviceLease::new(),
        }
    }
}

impl Camera for PatternCamera {
    fn name(&self) -> &str {
        "test pattern"
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        let guard = self
            .lease
            .claim()
            .ok_or_else(|| CameraError::DeviceUnavailable("test pattern already in use".into()))?;
        info!("Acquired synthetic camera");
        Ok(Box::new(PatternStream { guard, tick: 0 }))
    }
}

struct PatternStream {
    guard: LeaseGuard,
    tick: u32,
}

impl VideoStream for PatternStream {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        if !self.guard.is_held() {
            return Err(CameraError::Stopped);
        }
        self.tick = self.tick.wrapping_add(1);
        Ok(pattern_frame(self.tick))
    }

    fn stop(&mut self) {
        if self.guard.release() {
            info!("Released synthetic camera");
        }
    }

    fn is_live(&self) -> bool {
        self.guard.is_held()
    }
}

/// Green gradient with a sweeping bar and a fixed orange marker in the
/// top-left corner, so mirroring is visible.
fn pattern_frame(tick: u32) -> RgbImage {
    let bar_x = tick.wrapping_mul(3) % PATTERN_WIDTH;
    RgbImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
        if x < 24 && y < 24 {
            return Rgb([255, 107, 69]);
        }
        if x.abs_diff(bar_x) < 4 {
            return Rgb([234, 244, 236]);
        }
        let g = 57 + (y * 120 / PATTERN_HEIGHT) as u8;
        let b = 50 + (x * 60 / PATTERN_WIDTH) as u8;
        Rgb([30, g, b])
    })
}

// ============================================================================
// Image files
// ============================================================================

pub struct FileCamera {
    path: PathBuf,
    lease: DeviceLease,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lease: DeviceLease::new(),
        }
    }
}

fn map_io_error(path: &Path, e: io::Error) -> CameraError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            CameraError::PermissionDenied(format!("{}: {e}", path.display()))
        }
        _ => CameraError::DeviceUnavailable(format!("{}: {e}", path.display())),
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["png", "jpg", "jpeg"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Lists the frame files behind a source path, sorted by name.
fn frame_paths(path: &Path) -> Result<Vec<PathBuf>, CameraError> {
    let meta = fs::metadata(path).map_err(|e| map_io_error(path, e))?;
    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(path)
        .map_err(|e| map_io_error(path, e))?
        .filter_map(|res| res.ok().map(|entry| entry.path()))
        .filter(|p| is_image_file(p))
        .collect();
    entries.sort();

    if entries.is_empty() {
        return Err(CameraError::DeviceUnavailable(format!(
            "{}: no png/jpeg frames",
            path.display()
        )));
    }
    Ok(entries)
}

fn load_frame(path: &Path) -> Result<RgbImage, CameraError> {
    let bytes = fs::read(path).map_err(|e| map_io_error(path, e))?;
    image::load_from_memory(&bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| CameraError::DeviceUnavailable(format!("{}: {e}", path.display())))
}

impl Camera for FileCamera {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("image source")
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        let paths = frame_paths(&self.path)?;

        // Decode everything up front so a broken file fails acquisition
        // instead of a later capture.
        let frames = paths
            .iter()
            .map(|p| load_frame(p))
            .collect::<Result<Vec<_>, _>>()?;

        let guard = self.lease.claim().ok_or_else(|| {
            CameraError::DeviceUnavailable(format!("{} already in use", self.path.display()))
        })?;

        info!(
            "Acquired file camera {} ({} frame(s))",
            self.path.display(),
            frames.len()
        );
        Ok(Box::new(FileStream {
            guard,
            frames,
            started: Instant::now(),
        }))
    }
}

struct FileStream {
    guard: LeaseGuard,
    frames: Vec<RgbImage>,
    started: Instant,
}

impl VideoStream for FileStream {
    fn read_frame(&mut self) -> Result<RgbImage, CameraError> {
        if !self.guard.is_held() {
            return Err(CameraError::Stopped);
        }
        let index = (self.started.elapsed().as_millis() / FILE_FRAME_PERIOD_MS) as usize
            % self.frames.len().max(1);
        match self.frames.get(index) {
            Some(frame) => Ok(frame.clone()),
            None => {
                warn!("File stream has no frames");
                Err(CameraError::Frame("no frames loaded".into()))
            }
        }
    }

    fn stop(&mut self) {
        if self.guard.release() {
            debug!("Released file camera");
        }
    }

    fn is_live(&self) -> bool {
        self.guard.is_held()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sunbucks-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_pattern_camera_is_exclusive() {
        let mut camera = PatternCamera::new();
        let mut stream = camera.acquire().unwrap();
        assert!(matches!(
            camera.acquire(),
            Err(CameraError::DeviceUnavailable(_))
        ));

        stream.stop();
        assert!(camera.acquire().is_ok());
    }

    #[test]
    fn test_stopped_stream_refuses_frames() {
        let mut camera = PatternCamera::new();
        let mut stream = camera.acquire().unwrap();
        assert!(stream.read_frame().is_ok());
        stream.stop();
        stream.stop();
        assert!(!stream.is_live());
        assert_eq!(stream.read_frame(), Err(CameraError::Stopped));
    }

    #[test]
    fn test_pattern_marker_is_top_left() {
        let frame = pattern_frame(0);
        assert_eq!(frame.get_pixel(2, 2), &Rgb([255, 107, 69]));
        assert_ne!(frame.get_pixel(PATTERN_WIDTH - 3, 2), &Rgb([255, 107, 69]));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let mut camera = FileCamera::new("/definitely/not/here.png");
        assert!(matches!(
            camera.acquire(),
            Err(CameraError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_directory_without_images_is_unavailable() {
        let dir = temp_dir("empty");
        fs::write(dir.join("notes.txt"), "not a frame").unwrap();
        let mut camera = FileCamera::new(&dir);
        assert!(matches!(
            camera.acquire(),
            Err(CameraError::DeviceUnavailable(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_camera_reads_image() {
        let dir = temp_dir("frames");
        let path = dir.join("frame.png");
        RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])).save(&path).unwrap();

        let mut camera = open_camera(dir.to_str().unwrap());
        let mut stream = camera.acquire().unwrap();
        let frame = stream.read_frame().unwrap();
        assert_eq!(frame.dimensions(), (8, 4));
        assert_eq!(frame.get_pixel(0, 0), &Rgb([10, 20, 30]));
        stream.stop();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_open_camera_pattern_keyword() {
        let camera = open_camera("Pattern");
        assert_eq!(camera.name(), "test pattern");
    }

    #[test]
    fn test_webcam_sources() {
        assert_eq!(webcam_index("0"), Some(0));
        assert_eq!(webcam_index(" 2 "), Some(2));
        assert_eq!(webcam_index("/dev/video1"), Some(1));
        assert_eq!(webcam_index("webcam"), Some(0));
        assert_eq!(webcam_index("Default"), Some(0));
        assert_eq!(webcam_index("pattern"), None);
        assert_eq!(webcam_index("/srv/frames"), None);
        assert_eq!(webcam_index("-1"), None);
    }

    #[test]
    fn test_numeric_sources_open_a_webcam() {
        assert_eq!(open_camera(DEFAULT_CAMERA_SOURCE).name(), "webcam 0");
        assert_eq!(open_camera("/dev/video3").name(), "webcam 3");
        assert_eq!(open_camera("webcam").name(), "webcam 0");
        // Paths still go to the file camera
        assert_eq!(open_camera("/srv/frames").name(), "/srv/frames");
    }
}
