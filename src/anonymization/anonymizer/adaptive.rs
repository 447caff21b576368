//! Adaptive strategy table
//!
//! Adaptive has no replacement logic of its own: each type is routed to one
//! of the concrete strategies.

use crate::anonymization::config::Strategy;
use crate::anonymization::models::PiiType;

/// Concrete strategy applied to `label` under adaptive
pub fn strategy_for(label: PiiType) -> Strategy {
    match label {
        PiiType::PersonName
        | PiiType::Phone
        | PiiType::Ssn
        | PiiType::CreditCard
        | PiiType::Passport
        | PiiType::DriversLicense => Strategy::Mask,
        PiiType::Email => Strategy::Partial,
        PiiType::Url | PiiType::Organization | PiiType::Location | PiiType::DateTime => {
            Strategy::Placeholder
        }
        PiiType::IpAddress => Strategy::Hash,
    }
}
