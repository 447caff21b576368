//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that orchestrates
//! detection fan-out, span reconciliation, replacement and audit logging.
//!
//! # Pipeline
//!
//! - **Detectors** run concurrently, each under a time budget
//! - **Confidence floor** discards detections below `min_confidence`
//! - **Reconciler** produces ordered, non-overlapping annotations
//! - **Strategy engine** rewrites the annotated regions through a per-call cache
//! - **Audit logger** records the request with hashed values (optional)
//!
//! # Examples
//!
//! ```no_run
//! use veil::anonymization::{AnonymizationEngine, AnonymizationConfig, Strategy};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let result = engine
//!     .anonymize_text("Call (555) 123-4567", Strategy::Mask)
//!     .await?;
//! assert_eq!(result.anonymized_text, "Call ***-***-4567");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::StrategyEngine,
    audit::AuditLogger,
    config::{AnonymizationConfig, Strategy},
    detector::{patterns::PatternRegistry, DetectorSet, RegexDetector, RemoteDetector},
    models::{AnonymizationResult, AnonymizedText, Annotation, DetectionOutcome},
    reconciler::SpanReconciler,
    report::EntityStats,
};
use crate::domain::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Main anonymization engine
///
/// The engine holds no per-request state and can be shared across tasks
/// with `Arc`. Every call builds its own consistency cache.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    detectors: DetectorSet,
    reconciler: SpanReconciler,
    strategies: StrategyEngine,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Validates the configuration and registers the regex detector (built-in
    /// or custom pattern library) plus every enabled remote detector.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails, the pattern
    /// library cannot be loaded, or the audit log cannot be prepared.
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config.validate()?;
        let detectors = Self::build_detectors(&config)?;
        Self::assemble(config, detectors)
    }

    /// Create an engine over caller-supplied detectors
    ///
    /// Detector settings in `config` are ignored; everything else applies.
    pub fn with_detectors(config: AnonymizationConfig, detectors: DetectorSet) -> Result<Self> {
        Self::assemble(config, detectors)
    }

    fn assemble(config: AnonymizationConfig, detectors: DetectorSet) -> Result<Self> {
        let strategies = match config.hash_salt {
            Some(ref salt) => StrategyEngine::new(salt.clone(), config.placeholder_numbering),
            None => StrategyEngine::with_random_salt(config.placeholder_numbering),
        };

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?)
        } else {
            None
        };

        tracing::debug!(
            detectors = ?detectors.names(),
            strategy = %config.strategy,
            audit = audit_logger.is_some(),
            "Anonymization engine ready"
        );

        Ok(Self {
            reconciler: SpanReconciler::new(config.reconciler),
            config,
            detectors,
            strategies,
            audit_logger,
        })
    }

    fn build_detectors(config: &AnonymizationConfig) -> Result<DetectorSet> {
        let mut detectors = DetectorSet::new(config.detector_timeout());

        if config.regex.enabled {
            let detector = match config.pattern_library {
                Some(ref path) => RegexDetector::with_registry(PatternRegistry::from_file(path)?),
                None => RegexDetector::new()?,
            };
            detectors.push(Arc::new(detector));
        }

        for remote in config.remote.iter().filter(|r| r.enabled) {
            detectors.push(Arc::new(RemoteDetector::new(remote, config.detector_timeout())?));
        }

        Ok(detectors)
    }

    /// Engine configuration
    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Names of registered detectors
    pub fn detector_names(&self) -> Vec<String> {
        self.detectors.names()
    }

    /// Run every detector and reconcile their output
    ///
    /// Never fails: unavailable detectors and malformed detections reduce
    /// recall and are reported in the outcome.
    pub async fn detect(&self, text: &str) -> DetectionOutcome {
        let start = Instant::now();

        let fan_out = self.detectors.run_all(text).await;

        let min_confidence = self.config.min_confidence;
        let mut detections = fan_out.detections;
        let before = detections.len();
        detections.retain(|d| d.confidence.is_nan() || d.confidence >= min_confidence);
        let below_threshold = before - detections.len();

        let reconciliation = self.reconciler.reconcile(text, detections);

        DetectionOutcome {
            annotations: reconciliation.annotations,
            below_threshold,
            invalid: reconciliation.invalid,
            overlapped: reconciliation.overlapped,
            unavailable_detectors: fan_out.unavailable,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Rewrite `text` for already reconciled annotations
    pub fn anonymize_annotations(
        &self,
        text: &str,
        annotations: &[Annotation],
        strategy: Strategy,
    ) -> AnonymizedText {
        self.strategies.anonymize(text, annotations, strategy)
    }

    /// Detect and anonymize `text` with `strategy`
    ///
    /// # Errors
    ///
    /// Returns an error only when the audit log cannot be written.
    pub async fn anonymize_text(&self, text: &str, strategy: Strategy) -> Result<AnonymizationResult> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let outcome = self.detect(text).await;

        let anonymize_start = Instant::now();
        let anonymized = self.anonymize_annotations(text, &outcome.annotations, strategy);
        let anonymization_time_ms = anonymize_start.elapsed().as_millis() as u64;

        let result = AnonymizationResult {
            request_id,
            timestamp: Utc::now(),
            original_text: text.to_string(),
            anonymized_text: anonymized.anonymized_text,
            strategy,
            stats: EntityStats::from_entities(&anonymized.entities),
            entities: anonymized.entities,
            replacements: anonymized.replacements,
            unavailable_detectors: outcome.unavailable_detectors,
            detection_time_ms: outcome.processing_time_ms,
            anonymization_time_ms,
        };

        if let Some(ref logger) = self.audit_logger {
            logger.log_anonymization(&result)?;
        }

        crate::log_anonymization_complete!(
            request_id,
            strategy,
            result.entities.len(),
            started.elapsed()
        );

        Ok(result)
    }

    /// Detect and anonymize `text` with the configured strategy
    pub async fn anonymize_with_default(&self, text: &str) -> Result<AnonymizationResult> {
        self.anonymize_text(text, self.config.strategy).await
    }
}
