//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use veil::anonymization::detector::{Detector, DetectorSet, RegexDetector};
use veil::anonymization::{AnonymizationConfig, Detection, DetectorSource, PiiType, Span};
use veil::config::secret_string;
use veil::domain::DetectorError;

/// Detector returning a fixed list of detections
pub struct StubDetector {
    pub name: &'static str,
    pub source: DetectorSource,
    pub detections: Vec<Detection>,
}

impl StubDetector {
    pub fn new(name: &'static str, source: DetectorSource) -> Self {
        Self {
            name,
            source,
            detections: Vec::new(),
        }
    }

    pub fn with(mut self, start: usize, end: usize, label: PiiType, confidence: f32) -> Self {
        self.detections.push(
            Detection::new(Span::new(start, end), label, self.source, self.name)
                .with_confidence(confidence),
        );
        self
    }
}

#[async_trait]
impl Detector for StubDetector {
    fn name(&self) -> &str {
        self.name
    }

    fn source(&self) -> DetectorSource {
        self.source
    }

    async fn detect(&self, _text: &str) -> Result<Vec<Detection>, DetectorError> {
        Ok(self.detections.clone())
    }
}

/// Detector that always fails
pub struct DownDetector;

#[async_trait]
impl Detector for DownDetector {
    fn name(&self) -> &str {
        "down"
    }

    fn source(&self) -> DetectorSource {
        DetectorSource::Framework
    }

    async fn detect(&self, _text: &str) -> Result<Vec<Detection>, DetectorError> {
        Err(DetectorError::Unavailable {
            name: "down".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// Config with a fixed hash salt
pub fn salted_config(salt: &str) -> AnonymizationConfig {
    AnonymizationConfig {
        hash_salt: Some(secret_string(salt.to_string())),
        ..Default::default()
    }
}

/// Detector set with the built-in regex detector plus `extra`
pub fn regex_plus(extra: Vec<Arc<dyn Detector>>) -> DetectorSet {
    let mut set = DetectorSet::new(Duration::from_secs(2));
    set.push(Arc::new(RegexDetector::new().unwrap()));
    for detector in extra {
        set.push(detector);
    }
    set
}
