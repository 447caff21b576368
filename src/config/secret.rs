//! Secure handling of configured secrets using the secrecy crate
//!
//! Two settings are secret: the hash-strategy salt (anyone holding it can
//! confirm a guessed PII value against a digest) and remote detector API keys.
//! Both are wrapped so memory is zeroed on drop and `Debug` output is redacted.
//!
//! # Example
//!
//! ```rust
//! use veil::config::{SecretString, SecretValue};
//! use secrecy::{Secret, ExposeSecret};
//!
//! let salt: SecretString = Secret::new(SecretValue::from("pepper".to_string()));
//!
//! // Access the secret (only when needed)
//! let salt_str = salt.expose_secret();
//!
//! // Debug output is redacted
//! println!("{:?}", salt); // Prints: Secret([REDACTED])
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes of the secret, for feeding into a digest
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
///
/// This wraps a `SecretValue` in a `Secret` container that:
/// - Zeros the memory when dropped
/// - Prevents accidental logging via Debug
/// - Requires explicit `expose_secret()` to access
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
///
/// # Example
///
/// ```rust
/// use veil::config::secret_string;
///
/// let salt = secret_string("pepper".to_string());
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("pepper".to_string());
        assert_eq!(secret.expose_secret(), "pepper");
        assert_eq!(secret.expose_secret().as_bytes(), b"pepper");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-salt".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-salt"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct TestConfig {
            hash_salt: SecretString,
        }

        let config: TestConfig = toml::from_str(r#"hash_salt = "s3cr3t""#).unwrap();
        assert_eq!(config.hash_salt.expose_secret(), "s3cr3t");
        assert!(!config.hash_salt.expose_secret().is_empty());
    }
}
