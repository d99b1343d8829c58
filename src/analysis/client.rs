//! HTTP client for the emotion service.
//!
//! ```text
//! POST {base}/api/analyze   { "image": "data:image/jpeg;base64,..." }  →  { "emotion": "Happy" }
//! GET  {base}/api/emotion                                              →  { "emotion": "Calm" }
//! ```
//!
//! One request per call. No retries; the reqwest default timeout applies.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use super::{AnalysisError, EmotionService};
use crate::core::emotion::EmotionLabel;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";

#[derive(Serialize, Debug)]
struct AnalyzeRequest<'a> {
    image: &'a str,
}

pub struct HttpEmotionService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEmotionService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks the status and pulls a string `emotion` out of the body.
    async fn read_emotion(response: reqwest::Response) -> Result<EmotionLabel, AnalysisError> {
        let status = response.status();
        debug!("Emotion service response status: {}", status);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Emotion service error: {} - {}", status.as_u16(), message);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        parse_emotion_body(&body)
    }
}

/// Extracts the label from a decoded response body.
///
/// A missing or non-string `emotion` is malformed. A string that names no
/// known mood is still a valid answer and parses to Calm.
pub fn parse_emotion_body(body: &Value) -> Result<EmotionLabel, AnalysisError> {
    let raw = body
        .get("emotion")
        .ok_or_else(|| AnalysisError::Malformed("missing `emotion` field".to_string()))?
        .as_str()
        .ok_or_else(|| AnalysisError::Malformed("`emotion` is not a string".to_string()))?;

    let label = EmotionLabel::parse(raw);
    if EmotionLabel::recognize(raw).is_none() {
        info!("Unrecognized emotion {:?}, falling back to {}", raw, label);
    }
    Ok(label)
}

#[async_trait]
impl EmotionService for HttpEmotionService {
    fn name(&self) -> &str {
        "http"
    }

    async fn analyze(&self, image_data_url: &str) -> Result<EmotionLabel, AnalysisError> {
        info!(
            "Submitting capture for analysis ({} bytes) to {}",
            image_data_url.len(),
            self.base_url
        );

        let response = self
            .client
            .post(format!("{}/api/analyze", self.base_url))
            .json(&AnalyzeRequest {
                image: image_data_url,
            })
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let label = Self::read_emotion(response).await?;
        info!("Analysis result: {}", label);
        Ok(label)
    }

    async fn current_emotion(&self) -> Result<EmotionLabel, AnalysisError> {
        let response = self
            .client
            .get(format!("{}/api/emotion", self.base_url))
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let label = Self::read_emotion(response).await?;
        debug!("Polled emotion: {}", label);
        Ok(label)
    }
}
