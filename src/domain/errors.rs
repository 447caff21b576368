//! Domain error types
//!
//! This module defines the error hierarchy for Veil.
//! Errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library. Malformed
/// detector output never surfaces here; it is dropped at ingestion. These
/// variants cover broken caller contracts and configuration problems.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A strategy name outside the supported set was requested
    #[error("Unknown anonymization strategy: {0}. Must be one of: adaptive, hash, placeholder, mask, partial")]
    UnknownStrategy(String),

    /// A PII type label that cannot be mapped to a known type
    #[error("Unknown PII type: {0}")]
    UnknownPiiType(String),

    /// Detector-related errors
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Audit logging errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Detector-specific errors
///
/// Any of these makes a detector "unavailable" for one request. The fan-out
/// layer turns them into an empty contribution instead of failing the run.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Detector could not be initialized or reached
    #[error("Detector '{name}' unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    /// Detector did not answer within its time budget
    #[error("Detector '{name}' timed out after {timeout_ms}ms")]
    Timeout { name: String, timeout_ms: u64 },

    /// Detector answered with something that could not be understood
    #[error("Detector '{name}' returned an invalid response: {reason}")]
    InvalidResponse { name: String, reason: String },

    /// Transport failure talking to a remote detector
    #[error("Detector '{name}' HTTP error: {status} - {message}")]
    Http {
        name: String,
        status: u16,
        message: String,
    },
}

impl DetectorError {
    /// Name of the detector that produced the error
    pub fn detector_name(&self) -> &str {
        match self {
            Self::Unavailable { name, .. }
            | Self::Timeout { name, .. }
            | Self::InvalidResponse { name, .. }
            | Self::Http { name, .. } => name,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}
