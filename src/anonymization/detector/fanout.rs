//! Concurrent detector fan-out
//!
//! Every detector runs in its own tokio task over a shared copy of the text,
//! bounded by a timeout, and all tasks are joined before reconciliation. A
//! detector that errors, panics or times out contributes nothing and is
//! reported by name.

use super::Detector;
use crate::anonymization::models::Detection;
use crate::domain::DetectorError;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Combined output of one fan-out
#[derive(Debug, Clone, Default)]
pub struct FanOutResult {
    /// Detections from every detector that answered, in registration order
    pub detections: Vec<Detection>,
    /// Names of detectors that failed or timed out
    pub unavailable: Vec<String>,
}

/// Registered detectors with a shared time budget
#[derive(Clone)]
pub struct DetectorSet {
    detectors: Vec<Arc<dyn Detector>>,
    timeout: Duration,
}

impl DetectorSet {
    /// Create an empty set with a per-detector time budget
    pub fn new(timeout: Duration) -> Self {
        Self {
            detectors: Vec::new(),
            timeout,
        }
    }

    /// Register a detector
    pub fn with_detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Register a detector in place
    pub fn push(&mut self, detector: Arc<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Number of registered detectors
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// True when no detector is registered
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Names of registered detectors, in registration order
    pub fn names(&self) -> Vec<String> {
        self.detectors.iter().map(|d| d.name().to_string()).collect()
    }

    /// Run every detector concurrently over `text` and join the results
    pub async fn run_all(&self, text: &str) -> FanOutResult {
        let shared: Arc<str> = Arc::from(text);

        let tasks = self.detectors.iter().map(|detector| {
            let detector = Arc::clone(detector);
            let text = Arc::clone(&shared);
            let budget = detector.timeout().unwrap_or(self.timeout);

            async move {
                let name = detector.name().to_string();
                let handle = tokio::spawn(async move { detector.detect(&text).await });
                let abort = handle.abort_handle();

                let outcome = match tokio::time::timeout(budget, handle).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) => Err(DetectorError::Unavailable {
                        name: name.clone(),
                        reason: format!("detector task failed: {join_error}"),
                    }),
                    Err(_) => {
                        abort.abort();
                        Err(DetectorError::Timeout {
                            name: name.clone(),
                            timeout_ms: budget.as_millis() as u64,
                        })
                    }
                };
                (name, outcome)
            }
        });

        let mut result = FanOutResult::default();
        for (name, outcome) in join_all(tasks).await {
            match outcome {
                Ok(detections) => {
                    tracing::debug!(detector = %name, count = detections.len(), "Detector finished");
                    result.detections.extend(detections);
                }
                Err(error) => {
                    crate::log_detector_unavailable!(name, error);
                    result.unavailable.push(name);
                }
            }
        }

        result
    }
}
