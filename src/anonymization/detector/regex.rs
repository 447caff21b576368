//! Regex-based PII detector

use super::{patterns::PatternRegistry, Detector};
use crate::anonymization::models::{Detection, DetectorSource, Span};
use crate::domain::{DetectorError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Regex-based PII detector
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl RegexDetector {
    /// Registered name of the regex detector
    pub const NAME: &'static str = "regex";

    /// Create a new regex detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Scan `text` with every pattern
    pub fn scan(&self, text: &str) -> Vec<Detection> {
        let mut detections = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            for matched in pattern.regex.find_iter(text) {
                if matched.start() == matched.end() {
                    continue;
                }
                detections.push(
                    Detection::new(
                        Span::new(matched.start(), matched.end()),
                        pattern.label,
                        DetectorSource::Regex,
                        Self::NAME,
                    )
                    .with_confidence(pattern.confidence),
                );
            }
        }

        detections
    }
}

#[async_trait]
impl Detector for RegexDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn source(&self) -> DetectorSource {
        DetectorSource::Regex
    }

    async fn detect(&self, text: &str) -> std::result::Result<Vec<Detection>, DetectorError> {
        Ok(self.scan(text))
    }
}
