//! Hash anonymization strategy

use super::Anonymizer;
use crate::anonymization::cache::normalize;
use crate::anonymization::models::PiiType;
use crate::config::{secret_string, SecretString};
use rand::RngCore;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest
const DIGEST_PREFIX_LEN: usize = 8;

/// Hash strategy - replaces PII with `[LABEL_<digest>]`
///
/// The digest is SHA-256 over `salt ‖ 0x00 ‖ type ‖ 0x00 ‖ normalized value`,
/// so equal values of the same type share a token and the same value under
/// two types does not. Tokens are stable across runs only with a fixed salt.
pub struct HashStrategy {
    salt: SecretString,
}

impl HashStrategy {
    /// Create a hash strategy with a fixed salt
    pub fn new(salt: SecretString) -> Self {
        Self { salt }
    }

    /// Create a hash strategy with a random salt
    pub fn with_random_salt() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self::new(secret_string(hex))
    }

    /// Lowercase hex digest prefix for a value
    pub fn digest(&self, label: PiiType, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.expose_secret().as_bytes());
        hasher.update([0u8]);
        hasher.update(label.name().as_bytes());
        hasher.update([0u8]);
        hasher.update(normalize(value).as_bytes());

        hasher
            .finalize()
            .iter()
            .take(DIGEST_PREFIX_LEN / 2)
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

impl Anonymizer for HashStrategy {
    fn replace(&self, label: PiiType, value: &str, _ordinal: usize) -> String {
        format!("[{}_{}]", label.placeholder_label(), self.digest(label, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let strategy = HashStrategy::new(secret_string("pepper".to_string()));
        let token = strategy.replace(PiiType::IpAddress, "10.0.0.1", 1);

        assert!(token.starts_with("[IP_ADDRESS_"));
        assert!(token.ends_with(']'));
        let digest = &token["[IP_ADDRESS_".len()..token.len() - 1];
        assert_eq!(digest.len(), DIGEST_PREFIX_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_stable_for_same_salt_and_normalized_value() {
        let a = HashStrategy::new(secret_string("pepper".to_string()));
        let b = HashStrategy::new(secret_string("pepper".to_string()));

        assert_eq!(
            a.replace(PiiType::PersonName, "John  Doe", 1),
            b.replace(PiiType::PersonName, "john doe", 5)
        );
    }

    #[test]
    fn test_hash_depends_on_salt_and_type() {
        let a = HashStrategy::new(secret_string("pepper".to_string()));
        let b = HashStrategy::new(secret_string("paprika".to_string()));

        assert_ne!(a.digest(PiiType::Email, "x@y.com"), b.digest(PiiType::Email, "x@y.com"));
        assert_ne!(a.digest(PiiType::PersonName, "jordan"), a.digest(PiiType::Location, "jordan"));
    }

    #[test]
    fn test_random_salts_differ() {
        let a = HashStrategy::with_random_salt();
        let b = HashStrategy::with_random_salt();
        assert_ne!(a.digest(PiiType::Ssn, "123-45-6789"), b.digest(PiiType::Ssn, "123-45-6789"));
    }
}
