//! PII detection module
//!
//! Detectors are independent, read-only producers of [`Detection`]s over the
//! same text. [`DetectorSet`] runs them concurrently, each under a time
//! budget, and turns failures into empty contributions.

pub mod fanout;
pub mod patterns;
pub mod regex;
pub mod remote;

pub use fanout::{DetectorSet, FanOutResult};
pub use regex::RegexDetector;
pub use remote::RemoteDetector;

use crate::anonymization::models::{Detection, DetectorSource};
use crate::domain::DetectorError;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for PII detector implementations
///
/// Implementations must return byte offsets into the exact text they were
/// given and must return an empty list, not an error, when nothing matches.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Registered detector name, unique within a [`DetectorSet`]
    fn name(&self) -> &str;

    /// Tier used for reconciliation priority
    fn source(&self) -> DetectorSource;

    /// Time budget overriding the set-wide default
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Detect PII in `text`
    async fn detect(&self, text: &str) -> Result<Vec<Detection>, DetectorError>;
}
