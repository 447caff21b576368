//! Partial anonymization strategy

use super::mask::{digits_tail, initials};
use super::Anonymizer;
use crate::anonymization::models::PiiType;

/// Per-type partial-reveal rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialRule {
    /// First `n` characters of the local part, `***`, then `@domain`
    EmailLocal(usize),
    /// Fixed prefix followed by the last `reveal` digits
    DigitsTail {
        prefix: &'static str,
        reveal: usize,
    },
    /// First character of each token, rest masked
    Initials,
    /// Keep `head` leading and `tail` trailing characters, mask the middle
    Edges { head: usize, tail: usize },
}

impl PartialRule {
    /// Rule used by the partial strategy for `label`
    pub fn for_type(label: PiiType) -> Self {
        match label {
            PiiType::Email => Self::EmailLocal(2),
            PiiType::Phone => Self::DigitsTail {
                prefix: "***-***-",
                reveal: 4,
            },
            PiiType::Ssn => Self::DigitsTail {
                prefix: "***-**-",
                reveal: 4,
            },
            PiiType::CreditCard => Self::DigitsTail {
                prefix: "****-****-****-",
                reveal: 4,
            },
            PiiType::PersonName => Self::Initials,
            PiiType::Organization | PiiType::Location => Self::Edges { head: 1, tail: 0 },
            PiiType::DateTime => Self::Edges { head: 0, tail: 4 },
            PiiType::IpAddress => Self::Edges { head: 3, tail: 0 },
            PiiType::Url => Self::Edges { head: 8, tail: 0 },
            PiiType::Passport | PiiType::DriversLicense => Self::Edges { head: 0, tail: 3 },
        }
    }

    /// Apply the rule to `value`
    pub fn apply(&self, value: &str) -> String {
        match *self {
            Self::EmailLocal(n) => match value.split_once('@') {
                Some((local, domain)) => {
                    let head: String = local.chars().take(n).collect();
                    format!("{head}***@{domain}")
                }
                None => edges(value, n, 0),
            },
            Self::DigitsTail { prefix, reveal } => digits_tail(value, prefix, reveal),
            Self::Initials => initials(value),
            Self::Edges { head, tail } => edges(value, head, tail),
        }
    }
}

fn edges(value: &str, head: usize, tail: usize) -> String {
    let len = value.chars().count();
    if head + tail >= len {
        return "*".repeat(len);
    }
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < head || i >= len - tail { c } else { '*' })
        .collect()
}

/// Partial strategy
#[derive(Debug, Default)]
pub struct PartialStrategy;

impl PartialStrategy {
    /// Create a new partial strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for PartialStrategy {
    fn replace(&self, label: PiiType, value: &str, _ordinal: usize) -> String {
        PartialRule::for_type(label).apply(value)
    }
}
