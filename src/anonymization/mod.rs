//! PII detection and anonymization
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: regex and remote detectors run concurrently ([`detector`])
//! - **Reconciliation**: overlapping detections resolved into ordered annotations ([`reconciler`])
//! - **Anonymization**: strategy-based replacement with per-call consistency ([`anonymizer`], [`cache`])
//! - **Reporting**: statistics, export formats and audit records ([`report`], [`audit`])
//!
//! # Usage
//!
//! ```rust,no_run
//! use veil::anonymization::{AnonymizationConfig, AnonymizationEngine, Strategy};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let result = engine.anonymize_text("Email a.b@c.org", Strategy::Placeholder).await?;
//! println!("{}", result.anonymized_text);
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod audit;
pub mod cache;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod reconciler;
pub mod report;

// Re-export main types
pub use anonymizer::StrategyEngine;
pub use cache::ConsistencyCache;
pub use config::{AnonymizationConfig, Strategy, TieBreak};
pub use engine::AnonymizationEngine;
pub use models::{
    AnonymizationResult, AnonymizedEntity, AnonymizedText, Annotation, Detection,
    DetectionOutcome, DetectorSource, PiiType, ReplacementRecord, Span,
};
pub use reconciler::{Reconciliation, SpanReconciler};
pub use report::{EntityStats, OutputFormat};
