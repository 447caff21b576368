//! Mask anonymization strategy

use super::Anonymizer;
use crate::anonymization::models::PiiType;

const MASK: char = '*';

/// Per-type masking rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskRule {
    /// Fixed prefix followed by the last `reveal` digits of the value
    DigitsTail {
        prefix: &'static str,
        reveal: usize,
    },
    /// First character of each whitespace-separated token, rest masked
    Initials,
    /// Mask every alphanumeric except the last `n`; keep punctuation and spaces
    Trailing(usize),
}

impl MaskRule {
    /// Rule used by the mask strategy for `label`
    pub fn for_type(label: PiiType) -> Self {
        match label {
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
            PiiType::Passport | PiiType::DriversLicense => Self::Trailing(3),
            _ => Self::Trailing(0),
        }
    }

    /// Apply the rule to `value`
    pub fn apply(&self, value: &str) -> String {
        match *self {
            Self::DigitsTail { prefix, reveal } => digits_tail(value, prefix, reveal),
            Self::Initials => initials(value),
            Self::Trailing(n) => trailing(value, n),
        }
    }
}

/// `prefix` plus the last `reveal` digits; values with too few digits are
/// fully masked instead
pub(crate) fn digits_tail(value: &str, prefix: &str, reveal: usize) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < reveal {
        return trailing(value, 0);
    }
    let mut out = String::with_capacity(prefix.len() + reveal);
    out.push_str(prefix);
    out.extend(&digits[digits.len() - reveal..]);
    out
}

/// Keep the first character of each token, mask the rest of it
pub(crate) fn initials(value: &str) -> String {
    let mut at_token_start = true;
    value
        .chars()
        .map(|c| {
            if c.is_whitespace() {
                at_token_start = true;
                c
            } else if at_token_start {
                at_token_start = false;
                c
            } else {
                MASK
            }
        })
        .collect()
}

fn trailing(value: &str, reveal: usize) -> String {
    let total = value.chars().filter(|c| c.is_alphanumeric()).count();
    let keep_from = total.saturating_sub(reveal);
    let mut seen = 0;
    value
        .chars()
        .map(|c| {
            if !c.is_alphanumeric() {
                return c;
            }
            seen += 1;
            if seen > keep_from {
                c
            } else {
                MASK
            }
        })
        .collect()
}

/// Mask strategy
#[derive(Debug, Default)]
pub struct MaskStrategy;

impl MaskStrategy {
    /// Create a new mask strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for MaskStrategy {
    fn replace(&self, label: PiiType, value: &str, _ordinal: usize) -> String {
        MaskRule::for_type(label).apply(value)
    }
}
