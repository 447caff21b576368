//! Configuration management for Veil.
//!
//! # Overview
//!
//! Veil reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`LoggingConfig`] - Console and rolling file logging
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - Detectors,
//!   reconciliation, strategies and audit
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! strategy = "hash"
//! hash_salt = "${VEIL_HASH_SALT}"
//! min_confidence = 0.5
//!
//! [anonymization.reconciler]
//! tie_break = "confidence_first"
//! coalesce_gap = 1
//!
//! [[anonymization.remote]]
//! name = "spacy"
//! endpoint = "http://localhost:8080"
//! source = "ner"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, LoggingConfig, VeilConfig};
pub use secret::{secret_string, SecretString, SecretValue};
