//! Audit logger for anonymization requests

use crate::anonymization::cache::normalize;
use crate::anonymization::models::{AnonymizationResult, AnonymizedEntity};
use crate::domain::{Result, VeilError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    request_id: String,
    strategy: String,
    entities_count: usize,
    distinct_values: usize,
    unavailable_detectors: Vec<String>,
    processing_time_ms: u64,
    entities: Vec<AuditEntity>,
}

/// Audit entity entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditEntity {
    label: String,
    source: String,
    detector: String,
    start: usize,
    end: usize,
    confidence: f32,
    /// SHA-256 hash of the normalized value (never log plaintext PII)
    value_hash: String,
}

/// Audit logger for anonymization requests
///
/// Appends one line per request to `log_path`.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                VeilError::Audit(format!(
                    "Failed to create audit log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Path of the audit log
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log one anonymization request
    pub fn log_anonymization(&self, result: &AnonymizationResult) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            request_id: result.request_id.to_string(),
            strategy: result.strategy.to_string(),
            entities_count: result.entities.len(),
            distinct_values: result.replacements.len(),
            unavailable_detectors: result.unavailable_detectors.clone(),
            processing_time_ms: result.total_time_ms(),
            entities: result.entities.iter().map(Self::audit_entity).collect(),
        };

        self.write_entry(&entry)
    }

    fn audit_entity(entity: &AnonymizedEntity) -> AuditEntity {
        let annotation = &entity.annotation;
        AuditEntity {
            label: annotation.label.to_string(),
            source: annotation.source.to_string(),
            detector: annotation.detector.clone(),
            start: annotation.span.start,
            end: annotation.span.end,
            confidence: annotation.confidence,
            value_hash: Self::hash_pii_value(&entity.text),
        }
    }

    /// Hash a PII value using SHA-256
    fn hash_pii_value(value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize(value).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                VeilError::Audit(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        let line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] Request: {} | Strategy: {} | Entities: {} | Distinct: {} | Time: {}ms",
                entry.timestamp,
                entry.request_id,
                entry.strategy,
                entry.entities_count,
                entry.distinct_values,
                entry.processing_time_ms
            )
        };

        writeln!(file, "{line}")
            .map_err(|e| VeilError::Audit(format!("Failed to write audit entry: {e}")))
    }
}
