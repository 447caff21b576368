//! Data models for detection, reconciliation and anonymization results

pub mod pii_entity;
pub mod result;

pub use pii_entity::{Annotation, Detection, DetectorSource, PiiType, Span};
pub use result::{
    AnonymizationResult, AnonymizedEntity, AnonymizedText, DetectionOutcome, ReplacementRecord,
};
