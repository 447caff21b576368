//! Result models produced by the engine

use super::pii_entity::{Annotation, PiiType};
use crate::anonymization::config::Strategy;
use crate::anonymization::report::EntityStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The replacement chosen for one distinct `(normalized value, label)` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRecord {
    /// Value as it first appeared in the text
    pub original_value: String,
    /// Replacement written for every occurrence of the value
    pub replacement: String,
    /// PII type
    pub label: PiiType,
    /// Concrete strategy applied (never adaptive)
    pub strategy: Strategy,
}

/// One replaced occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedEntity {
    /// Winning annotation for the region
    #[serde(flatten)]
    pub annotation: Annotation,
    /// Original text of the region
    pub text: String,
    /// Text written in its place
    pub replacement: String,
}

/// Output of one strategy engine pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Text with every annotated region replaced
    pub anonymized_text: String,
    /// Per-occurrence view, ordered by span start
    pub entities: Vec<AnonymizedEntity>,
    /// One record per distinct key, in first-appearance order
    pub replacements: Vec<ReplacementRecord>,
}

/// Detection phase outcome: reconciled annotations plus what was dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Non-overlapping annotations ordered by start
    pub annotations: Vec<Annotation>,
    /// Detections discarded by the confidence floor
    pub below_threshold: usize,
    /// Detections rejected at ingestion (bad offsets, NaN confidence)
    pub invalid: usize,
    /// Detections that lost a region to a better candidate
    pub overlapped: usize,
    /// Detectors that failed or timed out for this request
    pub unavailable_detectors: Vec<String>,
    /// Wall-clock time of detection and reconciliation
    pub processing_time_ms: u64,
}

/// Full result of `anonymize_text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationResult {
    /// Request identifier, also used in audit records
    pub request_id: Uuid,
    /// When the request completed
    pub timestamp: DateTime<Utc>,
    /// Input text
    pub original_text: String,
    /// Output text
    pub anonymized_text: String,
    /// Strategy requested by the caller
    pub strategy: Strategy,
    /// Replaced occurrences
    pub entities: Vec<AnonymizedEntity>,
    /// Distinct replacements
    pub replacements: Vec<ReplacementRecord>,
    /// Aggregate statistics over `entities`
    pub stats: EntityStats,
    /// Detectors that contributed nothing because they failed
    pub unavailable_detectors: Vec<String>,
    /// Detection time in milliseconds
    pub detection_time_ms: u64,
    /// Replacement time in milliseconds
    pub anonymization_time_ms: u64,
}

impl AnonymizationResult {
    /// Total processing time
    pub fn total_time_ms(&self) -> u64 {
        self.detection_time_ms + self.anonymization_time_ms
    }

    /// True when nothing was replaced
    pub fn is_unchanged(&self) -> bool {
        self.entities.is_empty()
    }
}
