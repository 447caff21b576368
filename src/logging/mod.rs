//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr (stdout carries anonymized text)
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! Detected values are never logged; only counts, labels, spans and hashes.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a detector that contributed nothing to a request
///
/// # Example
///
/// ```no_run
/// use veil::log_detector_unavailable;
/// use veil::domain::DetectorError;
///
/// let error = DetectorError::Timeout { name: "spacy".to_string(), timeout_ms: 500 };
/// log_detector_unavailable!("spacy", &error);
/// ```
#[macro_export]
macro_rules! log_detector_unavailable {
    ($detector:expr, $error:expr) => {
        tracing::warn!(
            detector = %$detector,
            error = %$error,
            "Detector unavailable, continuing with reduced recall"
        );
    };
}

/// Log the outcome of one reconciliation pass
///
/// # Example
///
/// ```no_run
/// use veil::log_reconciliation;
///
/// log_reconciliation!(3, 0, 2);
/// ```
#[macro_export]
macro_rules! log_reconciliation {
    ($kept:expr, $invalid:expr, $overlapped:expr) => {
        tracing::debug!(
            kept = $kept,
            invalid = $invalid,
            overlapped = $overlapped,
            "Reconciled detections"
        );
    };
}

/// Log the completion of an anonymization request
///
/// # Example
///
/// ```no_run
/// use veil::log_anonymization_complete;
/// use std::time::Duration;
///
/// let request_id = uuid::Uuid::new_v4();
/// log_anonymization_complete!(request_id, "adaptive", 4, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_anonymization_complete {
    ($request_id:expr, $strategy:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            request_id = %$request_id,
            strategy = %$strategy,
            entities = $count,
            duration_ms = $duration.as_millis() as u64,
            "Anonymization completed"
        );
    };
}
