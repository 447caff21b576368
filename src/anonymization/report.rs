//! Result statistics and export formats
//!
//! Turns an [`AnonymizationResult`] into the text printed by the CLI: the
//! anonymized text alone, a full JSON document, one CSV row per replaced
//! entity, or a human-readable summary.

use crate::anonymization::models::{AnonymizationResult, AnonymizedEntity, PiiType};
use crate::domain::{Result, VeilError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Entities bucketed by confidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    /// Confidence above 0.8
    pub high: usize,
    /// Confidence above 0.6, up to 0.8
    pub medium: usize,
    /// Everything else
    pub low: usize,
}

/// Aggregate statistics over the replaced entities of one result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    /// Number of replaced occurrences
    pub total_entities: usize,
    /// Occurrences per PII type
    pub entity_types: BTreeMap<PiiType, usize>,
    /// Occurrences per detector name
    pub sources: BTreeMap<String, usize>,
    /// Confidence histogram
    pub confidence_distribution: ConfidenceDistribution,
}

impl EntityStats {
    /// Compute statistics over `entities`
    pub fn from_entities(entities: &[AnonymizedEntity]) -> Self {
        let mut stats = Self {
            total_entities: entities.len(),
            ..Default::default()
        };

        for entity in entities {
            let annotation = &entity.annotation;
            *stats.entity_types.entry(annotation.label).or_insert(0) += 1;
            *stats
                .sources
                .entry(annotation.detector.clone())
                .or_insert(0) += 1;

            let bucket = &mut stats.confidence_distribution;
            if annotation.confidence > 0.8 {
                bucket.high += 1;
            } else if annotation.confidence > 0.6 {
                bucket.medium += 1;
            } else {
                bucket.low += 1;
            }
        }

        stats
    }
}

/// Output format for anonymization results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Anonymized text only
    #[default]
    Text,
    /// Full result as pretty-printed JSON
    Json,
    /// One row per replaced entity
    Csv,
    /// Human-readable statistics
    Summary,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Summary => "summary",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = VeilError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "summary" => Ok(Self::Summary),
            _ => Err(VeilError::Configuration(format!(
                "Invalid output format '{s}'. Must be one of: text, json, csv, summary"
            ))),
        }
    }
}

/// Render `result` in the requested format
pub fn export(result: &AnonymizationResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(result.anonymized_text.clone()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => Ok(format_csv(&result.entities)),
        OutputFormat::Summary => Ok(format_summary(result)),
    }
}

/// CSV with one row per replaced entity
pub fn format_csv(entities: &[AnonymizedEntity]) -> String {
    let mut output =
        String::from("Entity Type,Original Text,Start,End,Confidence,Source,Anonymized\r\n");

    for entity in entities {
        let annotation = &entity.annotation;
        let row = [
            annotation.label.to_string(),
            entity.text.clone(),
            annotation.span.start.to_string(),
            annotation.span.end.to_string(),
            format!("{:.2}", annotation.confidence),
            annotation.detector.clone(),
            entity.replacement.clone(),
        ];
        let fields: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        output.push_str(&fields.join(","));
        output.push_str("\r\n");
    }

    output
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Human-readable summary of a result
pub fn format_summary(result: &AnonymizationResult) -> String {
    let stats = &result.stats;
    let mut output = String::new();

    output.push_str("PII Detection Summary\n");
    output.push_str("====================\n");
    output.push_str(&format!("Request ID:           {}\n", result.request_id));
    output.push_str(&format!("Strategy:             {}\n", result.strategy));
    output.push_str(&format!("Total entities found: {}\n", stats.total_entities));
    output.push_str(&format!(
        "Distinct values:      {}\n",
        result.replacements.len()
    ));

    if !stats.entity_types.is_empty() {
        output.push_str("\nEntity types:\n");
        for (label, count) in &stats.entity_types {
            output.push_str(&format!("  {:<20} {:>5}\n", label.to_string(), count));
        }
    }

    if !stats.sources.is_empty() {
        output.push_str("\nDetection sources:\n");
        for (source, count) in &stats.sources {
            output.push_str(&format!("  {source:<20} {count:>5}\n"));
        }
    }

    let distribution = &stats.confidence_distribution;
    output.push_str("\nConfidence distribution:\n");
    output.push_str(&format!("  High (>0.8):          {}\n", distribution.high));
    output.push_str(&format!("  Medium (0.6-0.8):     {}\n", distribution.medium));
    output.push_str(&format!("  Low (<=0.6):          {}\n", distribution.low));

    if !result.unavailable_detectors.is_empty() {
        output.push_str(&format!(
            "\nUnavailable detectors: {}\n",
            result.unavailable_detectors.join(", ")
        ));
    }

    output.push_str(&format!(
        "\nProcessing time: {} ms (detection {} ms, anonymization {} ms)\n",
        result.total_time_ms(),
        result.detection_time_ms,
        result.anonymization_time_ms
    ));

    output
}
