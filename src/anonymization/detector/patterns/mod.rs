//! Pattern library for regex PII detection

use crate::anonymization::models::PiiType;
use crate::domain::{Result, VeilError};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this type
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0); the type prior when omitted
    #[serde(default)]
    pub confidence: Option<f32>,
    /// PII type label
    pub category: String,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Entry name in the library
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// PII type
    pub label: PiiType,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for PII detection
///
/// Entries are compiled in name order so detection output is deterministic.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_type: HashMap<PiiType, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            VeilError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content)?;

        let mut patterns = Vec::new();
        let mut patterns_by_type: HashMap<PiiType, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            let label = PiiType::from_label(&def.category).ok_or_else(|| {
                VeilError::Configuration(format!(
                    "Invalid category in pattern '{name}': {}",
                    def.category
                ))
            })?;

            let confidence = match def.confidence {
                Some(c) if (0.0..=1.0).contains(&c) => c,
                Some(c) => {
                    return Err(VeilError::Configuration(format!(
                        "Confidence for pattern '{name}' must be between 0.0 and 1.0, got {c}"
                    )))
                }
                None => label.confidence_prior(),
            };

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).map_err(|e| {
                    VeilError::Configuration(format!(
                        "Invalid regex in pattern '{name}': {pattern_str}: {e}"
                    ))
                })?;

                let compiled = CompiledPattern {
                    name: name.clone(),
                    regex,
                    label,
                    confidence,
                };

                patterns.push(compiled.clone());
                patterns_by_type.entry(label).or_default().push(compiled);
            }
        }

        Ok(Self {
            patterns,
            patterns_by_type,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific type
    pub fn patterns_for_type(&self, label: PiiType) -> Option<&[CompiledPattern]> {
        self.patterns_by_type.get(&label).map(|v| v.as_slice())
    }
}
