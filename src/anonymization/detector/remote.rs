//! Remote model-server PII detector
//!
//! Talks to an inference server (statistical NER model or third-party PII
//! framework) over its `/infer` endpoint:
//!
//! ```text
//! POST {endpoint}/infer   {"input": "<text>"}
//! 200 OK                  {"output": [{"entity_type": "PERSON", "text": "John",
//!                                      "start": 8, "end": 12, "confidence": 0.91}]}
//! ```
//!
//! Upstream offsets are character offsets; they are converted to byte
//! offsets here. Entries with unknown labels or unusable offsets (negative,
//! inverted, past the end) are dropped one by one; the rest of the response
//! is kept.

use super::Detector;
use crate::anonymization::config::RemoteDetectorConfig;
use crate::anonymization::models::{Detection, DetectorSource, PiiType, Span};
use crate::config::SecretString;
use crate::domain::{DetectorError, Result, VeilError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferResponse {
    #[serde(default)]
    output: Vec<InferEntity>,
}

#[derive(Debug, Deserialize)]
struct InferEntity {
    #[serde(alias = "label", alias = "type")]
    entity_type: String,
    start: i64,
    end: i64,
    #[serde(default, alias = "score")]
    confidence: Option<f32>,
}

/// Remote model-server detector
pub struct RemoteDetector {
    name: String,
    infer_url: String,
    source: DetectorSource,
    api_key: Option<SecretString>,
    timeout: Option<Duration>,
    effective_timeout: Duration,
    client: Client,
}

impl RemoteDetector {
    /// Create a remote detector from configuration
    ///
    /// `default_timeout` bounds each HTTP request when the detector has no
    /// timeout of its own.
    pub fn new(config: &RemoteDetectorConfig, default_timeout: Duration) -> Result<Self> {
        let timeout = config.timeout_ms.map(Duration::from_millis);
        let effective_timeout = timeout.unwrap_or(default_timeout);

        let client = Client::builder()
            .timeout(effective_timeout)
            .build()
            .map_err(|e| {
                VeilError::Configuration(format!(
                    "Failed to build HTTP client for detector '{}': {e}",
                    config.name
                ))
            })?;

        Ok(Self {
            name: config.name.clone(),
            infer_url: format!("{}/infer", config.endpoint.trim_end_matches('/')),
            source: config.source,
            api_key: config.api_key.clone(),
            timeout,
            effective_timeout,
            client,
        })
    }

    fn convert(&self, text: &str, entities: Vec<InferEntity>) -> Vec<Detection> {
        let char_to_byte: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut detections = Vec::with_capacity(entities.len());
        let mut skipped = 0usize;

        for entity in entities {
            let Some(label) = PiiType::from_label(&entity.entity_type) else {
                skipped += 1;
                continue;
            };
            let offset = |chars: i64| {
                usize::try_from(chars)
                    .ok()
                    .and_then(|i| char_to_byte.get(i).copied())
            };
            let (Some(start), Some(end)) = (offset(entity.start), offset(entity.end)) else {
                skipped += 1;
                continue;
            };
            if start >= end {
                skipped += 1;
                continue;
            }

            let detection = Detection::new(Span::new(start, end), label, self.source, &self.name);
            detections.push(match entity.confidence {
                Some(confidence) => detection.with_confidence(confidence),
                None => detection,
            });
        }

        if skipped > 0 {
            tracing::debug!(detector = %self.name, skipped, "Dropped unmappable remote entities");
        }

        detections
    }
}

#[async_trait]
impl Detector for RemoteDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> DetectorSource {
        self.source
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn detect(&self, text: &str) -> std::result::Result<Vec<Detection>, DetectorError> {
        let mut request = self.client.post(&self.infer_url).json(&InferRequest { input: text });

        if let Some(ref key) = self.api_key {
            let token: &str = key.expose_secret().as_ref();
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DetectorError::Timeout {
                    name: self.name.clone(),
                    timeout_ms: self.effective_timeout.as_millis() as u64,
                }
            } else {
                DetectorError::Unavailable {
                    name: self.name.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            return Err(DetectorError::Http {
                name: self.name.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let body = resp
            .json::<InferResponse>()
            .await
            .map_err(|e| DetectorError::InvalidResponse {
                name: self.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(self.convert(text, body.output))
    }
}
