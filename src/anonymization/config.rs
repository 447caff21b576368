//! Anonymization configuration

use crate::anonymization::models::DetectorSource;
use crate::config::{secret_string, SecretString};
use crate::domain::{Result, VeilError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Anonymization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Per-type choice among the four concrete strategies
    #[default]
    Adaptive,
    /// Replace with `[LABEL_<digest>]`
    Hash,
    /// Replace with `[LABEL]`
    Placeholder,
    /// Mask characters, revealing a type-specific tail
    Mask,
    /// Keep a type-specific head/tail, mask the rest
    Partial,
}

impl Strategy {
    /// All strategy names accepted by [`FromStr`]
    pub const NAMES: [&'static str; 5] = ["adaptive", "hash", "placeholder", "mask", "partial"];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Hash => "hash",
            Self::Placeholder => "placeholder",
            Self::Mask => "mask",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = VeilError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "hash" => Ok(Self::Hash),
            "placeholder" => Ok(Self::Placeholder),
            "mask" => Ok(Self::Mask),
            "partial" => Ok(Self::Partial),
            _ => Err(VeilError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Ordering applied among overlapping detections that start at the same offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Higher confidence first, detector priority breaks equal confidence
    #[default]
    ConfidenceFirst,
    /// Higher-priority detector first, confidence breaks equal priority
    PriorityFirst,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfidenceFirst => write!(f, "confidence_first"),
            Self::PriorityFirst => write!(f, "priority_first"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = VeilError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confidence_first" => Ok(Self::ConfidenceFirst),
            "priority_first" => Ok(Self::PriorityFirst),
            _ => Err(VeilError::Configuration(format!(
                "Invalid tie_break '{s}'. Must be one of: confidence_first, priority_first"
            ))),
        }
    }
}

/// Span reconciliation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Tie-break between confidence and detector priority
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Maximum whitespace gap (bytes) across which adjacent same-label,
    /// same-detector annotations are merged; 0 disables merging
    #[serde(default = "default_coalesce_gap")]
    pub coalesce_gap: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            coalesce_gap: default_coalesce_gap(),
        }
    }
}

/// Built-in regex detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexDetectorConfig {
    /// Enable the regex detector
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RegexDetectorConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Remote model-server detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDetectorConfig {
    /// Detector name used in reports and logs (e.g. "spacy")
    pub name: String,

    /// Base URL of the model server; requests go to `{endpoint}/infer`
    pub endpoint: String,

    /// Detector tier used for reconciliation priority
    #[serde(default = "default_remote_source")]
    pub source: DetectorSource,

    /// Optional bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Per-detector time budget overriding `detector_timeout_ms`
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Enable this detector
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RemoteDetectorConfig {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VeilError::Configuration(
                "Remote detector name cannot be empty".to_string(),
            ));
        }
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            VeilError::Configuration(format!(
                "Invalid endpoint for remote detector '{}': {e}",
                self.name
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VeilError::Configuration(format!(
                "Remote detector '{}' endpoint must use http or https",
                self.name
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(VeilError::Configuration(format!(
                "Remote detector '{}' timeout_ms must be greater than 0",
                self.name
            )));
        }
        Ok(())
    }
}

/// Anonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Default anonymization strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Salt for the hash strategy; a random per-process salt is used when unset
    #[serde(default)]
    pub hash_salt: Option<SecretString>,

    /// Number placeholders per distinct value (`[EMAIL_ADDRESS_1]`)
    #[serde(default)]
    pub placeholder_numbering: bool,

    /// Detections below this confidence are discarded before reconciliation
    #[serde(default)]
    pub min_confidence: f32,

    /// Per-detector time budget in milliseconds
    #[serde(default = "default_detector_timeout_ms")]
    pub detector_timeout_ms: u64,

    /// Path to pattern library TOML file (built-in library when unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Span reconciliation settings
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Built-in regex detector
    #[serde(default)]
    pub regex: RegexDetectorConfig,

    /// Remote model-server detectors
    #[serde(default)]
    pub remote: Vec<RemoteDetectorConfig>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Adaptive,
            hash_salt: None,
            placeholder_numbering: false,
            min_confidence: 0.0,
            detector_timeout_ms: default_detector_timeout_ms(),
            pattern_library: None,
            reconciler: ReconcilerConfig::default(),
            regex: RegexDetectorConfig::default(),
            remote: Vec::new(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Per-detector time budget
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(VeilError::Configuration(format!(
                "min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            )));
        }

        if self.detector_timeout_ms == 0 {
            return Err(VeilError::Configuration(
                "detector_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(VeilError::Configuration(format!(
                    "Pattern library file not found: {}",
                    path.display()
                )));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(VeilError::Configuration(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                )));
            }
        }

        let mut names = HashSet::new();
        if self.regex.enabled {
            names.insert("regex".to_string());
        }
        for remote in self.remote.iter().filter(|r| r.enabled) {
            remote.validate()?;
            if !names.insert(remote.name.clone()) {
                return Err(VeilError::Configuration(format!(
                    "Duplicate detector name: {}",
                    remote.name
                )));
            }
        }
        if names.is_empty() {
            return Err(VeilError::Configuration(
                "At least one detector must be enabled".to_string(),
            ));
        }

        self.audit.validate()?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_STRATEGY") {
            self.strategy = val.parse()?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_HASH_SALT") {
            self.hash_salt = Some(secret_string(val));
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_PLACEHOLDER_NUMBERING") {
            self.placeholder_numbering = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_PLACEHOLDER_NUMBERING value: {val}"
                ))
            })?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_MIN_CONFIDENCE") {
            self.min_confidence = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_MIN_CONFIDENCE value: {val}"
                ))
            })?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_DETECTOR_TIMEOUT_MS") {
            self.detector_timeout_ms = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_DETECTOR_TIMEOUT_MS value: {val}"
                ))
            })?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_TIE_BREAK") {
            self.reconciler.tie_break = val.parse()?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_COALESCE_GAP") {
            self.reconciler.coalesce_gap = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_COALESCE_GAP value: {val}"
                ))
            })?;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err(VeilError::Configuration(
                "Audit logging enabled but log_path is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_AUDIT_ENABLED value: {val}"
                ))
            })?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val.parse().map_err(|_| {
                VeilError::Configuration(format!(
                    "Invalid VEIL_ANONYMIZATION_AUDIT_JSON_FORMAT value: {val}"
                ))
            })?;
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_coalesce_gap() -> usize {
    1
}

fn default_detector_timeout_ms() -> u64 {
    5000
}

fn default_remote_source() -> DetectorSource {
    DetectorSource::Ner
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/veil.log")
}
