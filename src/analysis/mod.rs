pub mod client;
pub mod poller;

use std::fmt;

use async_trait::async_trait;

use crate::core::emotion::EmotionLabel;

pub use client::HttpEmotionService;
pub use poller::{EmotionPoller, PollUpdate};

/// Errors that can occur while talking to the emotion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Service answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Body was not JSON, or had no string `emotion` field.
    Malformed(String),
}

impl AnalysisError {
    /// True for failures of the transport rather than of the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, AnalysisError::Network(_) | AnalysisError::Api { .. })
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Network(msg) => write!(f, "network error: {msg}"),
            AnalysisError::Api { status, message } => {
                write!(f, "service error (HTTP {status}): {message}")
            }
            AnalysisError::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// The external emotion-recognition backend.
#[async_trait]
pub trait EmotionService: Send + Sync {
    fn name(&self) -> &str;

    /// Classifies a captured still (`data:image/jpeg;base64,...`).
    async fn analyze(&self, image_data_url: &str) -> Result<EmotionLabel, AnalysisError>;

    /// Last emotion the service observed on its own (polling mode).
    async fn current_emotion(&self) -> Result<EmotionLabel, AnalysisError>;
}
