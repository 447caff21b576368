//! PII entity data models

use crate::domain::VeilError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PII type enumeration
///
/// The closed set of entity types the engine reconciles and anonymizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// US Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// IPv4 addresses
    IpAddress,
    /// Web URLs
    Url,
    /// Person names (first, middle, last)
    PersonName,
    /// Companies, agencies, institutions
    Organization,
    /// Cities, states, countries, facilities
    Location,
    /// Dates and times
    DateTime,
    /// Passport numbers
    Passport,
    /// Driver's license numbers
    DriversLicense,
}

impl PiiType {
    /// Every PII type, in declaration order
    pub const ALL: [PiiType; 12] = [
        Self::Email,
        Self::Phone,
        Self::Ssn,
        Self::CreditCard,
        Self::IpAddress,
        Self::Url,
        Self::PersonName,
        Self::Organization,
        Self::Location,
        Self::DateTime,
        Self::Passport,
        Self::DriversLicense,
    ];

    /// Canonical type name, as used in configuration and serialized output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::IpAddress => "IP_ADDRESS",
            Self::Url => "URL",
            Self::PersonName => "PERSON_NAME",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::DateTime => "DATE_TIME",
            Self::Passport => "PASSPORT",
            Self::DriversLicense => "DRIVERS_LICENSE",
        }
    }

    /// Label written by the placeholder and hash strategies
    pub fn placeholder_label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL_ADDRESS",
            Self::Phone => "PHONE_NUMBER",
            other => other.name(),
        }
    }

    /// Whether a value of this type can span several whitespace-separated
    /// tokens that a detector may report piecewise
    ///
    /// Structured values (emails, phone numbers, identifiers) are always
    /// reported whole, so two neighbours of those types are distinct values.
    pub fn is_multi_token(&self) -> bool {
        matches!(self, Self::PersonName | Self::Organization | Self::Location)
    }

    /// Detector-agnostic confidence prior
    ///
    /// Used when a pattern entry or a remote detector does not report its own
    /// score. Syntactic types get higher priors than semantic ones.
    pub fn confidence_prior(&self) -> f32 {
        match self {
            Self::Email => 0.95,
            Self::Ssn => 0.9,
            Self::CreditCard => 0.9,
            Self::IpAddress => 0.85,
            Self::Url => 0.85,
            Self::Phone => 0.8,
            Self::PersonName => 0.75,
            Self::Location => 0.7,
            Self::Organization => 0.65,
            Self::DateTime => 0.6,
            Self::Passport => 0.6,
            Self::DriversLicense => 0.55,
        }
    }

    /// Map an upstream detector label to a PII type
    ///
    /// Accepts canonical names plus the labels emitted by common NER models
    /// and PII frameworks (`PERSON`, `GPE`, `US_SSN`, ...). Labels without a
    /// counterpart (`MONEY`, `CARDINAL`, ...) yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_uppercase().replace(['-', ' '], "_");
        let pii_type = match normalized.as_str() {
            "EMAIL" | "EMAIL_ADDRESS" => Self::Email,
            "PHONE" | "PHONE_NUMBER" | "TELEPHONE" => Self::Phone,
            "SSN" | "US_SSN" => Self::Ssn,
            "CREDIT_CARD" | "CREDIT_CARD_NUMBER" => Self::CreditCard,
            "IP_ADDRESS" | "IP" => Self::IpAddress,
            "URL" => Self::Url,
            "PERSON" | "PERSON_NAME" | "NAME" | "PER" => Self::PersonName,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => Self::Organization,
            "LOCATION" | "LOC" | "GPE" | "FAC" => Self::Location,
            "DATE_TIME" | "DATE" | "TIME" | "DATETIME" => Self::DateTime,
            "PASSPORT" | "US_PASSPORT" => Self::Passport,
            "DRIVERS_LICENSE" | "DRIVER_LICENSE" | "US_DRIVER_LICENSE" => Self::DriversLicense,
            _ => return None,
        };
        Some(pii_type)
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PiiType {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| VeilError::UnknownPiiType(s.to_string()))
    }
}

/// Detector tier that produced a detection
///
/// The declaration order is the reconciliation priority: structured pattern
/// matches outrank statistical NER, which outranks the generic matches of a
/// general-purpose PII framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorSource {
    /// Regex pattern matching
    Regex,
    /// Statistical named entity recognition model
    Ner,
    /// General-purpose third-party PII framework
    Framework,
}

impl DetectorSource {
    /// Priority rank, lower wins
    pub fn rank(&self) -> u8 {
        match self {
            Self::Regex => 0,
            Self::Ner => 1,
            Self::Framework => 2,
        }
    }
}

impl fmt::Display for DetectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex => write!(f, "regex"),
            Self::Ner => write!(f, "ner"),
            Self::Framework => write!(f, "framework"),
        }
    }
}

/// Half-open byte range `[start, end)` into the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start byte offset
    pub start: usize,
    /// Exclusive end byte offset
    pub end: usize,
}

impl Span {
    /// Create a span without validating it
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes (zero for inverted spans)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check that the span is non-empty, inside `text` and on char boundaries
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }

    /// True when the two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice the span out of `text`, `None` if it does not fit
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// One detector's claim about a region of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Region of the original text
    #[serde(flatten)]
    pub span: Span,
    /// Claimed PII type
    pub label: PiiType,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Detector tier
    pub source: DetectorSource,
    /// Name of the registered detector instance
    pub detector: String,
}

impl Detection {
    /// Create a new detection with the type's prior confidence
    pub fn new(
        span: Span,
        label: PiiType,
        source: DetectorSource,
        detector: impl Into<String>,
    ) -> Self {
        Self {
            span,
            label,
            confidence: label.confidence_prior(),
            source,
            detector: detector.into(),
        }
    }

    /// Set the confidence score
    ///
    /// NaN is kept as-is so ingestion can reject it; finite values are clamped.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = if confidence.is_nan() {
            confidence
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }
}

/// A reconciled, winning detection
///
/// Annotation sets are ordered by `span.start` and never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Region of the original text
    #[serde(flatten)]
    pub span: Span,
    /// PII type
    pub label: PiiType,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Detector tier that won the region
    pub source: DetectorSource,
    /// Name of the detector that won the region
    pub detector: String,
}

impl From<Detection> for Annotation {
    fn from(detection: Detection) -> Self {
        Self {
            span: detection.span,
            label: detection.label,
            confidence: detection.confidence,
            source: detection.source,
            detector: detection.detector,
        }
    }
}
