//! Placeholder anonymization strategy

use super::Anonymizer;
use crate::anonymization::models::PiiType;

/// Placeholder strategy - replaces PII with `[LABEL]` tokens
///
/// With numbering enabled each distinct value of a label gets its
/// first-appearance ordinal: `[EMAIL_ADDRESS_1]`, `[EMAIL_ADDRESS_2]`.
#[derive(Debug, Default)]
pub struct PlaceholderStrategy {
    numbering: bool,
}

impl PlaceholderStrategy {
    /// Create a new placeholder strategy
    pub fn new(numbering: bool) -> Self {
        Self { numbering }
    }
}

impl Anonymizer for PlaceholderStrategy {
    fn replace(&self, label: PiiType, _value: &str, ordinal: usize) -> String {
        if self.numbering {
            format!("[{}_{ordinal}]", label.placeholder_label())
        } else {
            format!("[{}]", label.placeholder_label())
        }
    }
}
