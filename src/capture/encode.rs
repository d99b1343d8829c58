//! Frame encoding: mirror, JPEG, data URL.
//!
//! The live preview is shown mirrored, so the captured still is mirrored too:
//! what gets analyzed is exactly what the customer saw.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use log::debug;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;
const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    EmptyFrame,
    Jpeg(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EmptyFrame => write!(f, "frame has no pixels"),
            EncodeError::Jpeg(msg) => write!(f, "JPEG encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// A fully encoded still, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// Size of the JPEG before base64.
    pub jpeg_len: usize,
}

impl EncodedFrame {
    /// Base64 body of the data URL (without the `data:` prefix).
    pub fn base64_payload(&self) -> &str {
        self.data_url
            .strip_prefix(DATA_URL_PREFIX)
            .unwrap_or(&self.data_url)
    }
}

/// Mirrors a frame horizontally. Used for both preview and capture.
pub fn mirror(frame: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(frame)
}

/// Mirrors `frame`, encodes it as JPEG at `quality` (clamped to 1..=100) and
/// wraps the bytes in a `data:image/jpeg;base64,` URL.
///
/// Either the whole frame is encoded or nothing is returned.
pub fn encode_mirrored(frame: &RgbImage, quality: u8) -> Result<EncodedFrame, EncodeError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(EncodeError::EmptyFrame);
    }

    let mirrored = mirror(frame);
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(&mirrored)
        .map_err(|e| EncodeError::Jpeg(e.to_string()))?;

    debug!(
        "Encoded {}x{} frame: {} JPEG bytes (quality {})",
        frame.width(),
        frame.height(),
        jpeg.len(),
        quality
    );

    let mut data_url = String::with_capacity(DATA_URL_PREFIX.len() + jpeg.len() * 4 / 3 + 4);
    data_url.push_str(DATA_URL_PREFIX);
    STANDARD.encode_string(&jpeg, &mut data_url);

    Ok(EncodedFrame {
        data_url,
        width: frame.width(),
        height: frame.height(),
        jpeg_len: jpeg.len(),
    })
}
