// Veil - PII detection and anonymization
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - PII detection and anonymization
//!
//! Veil finds personally identifiable information in free text with several
//! detectors at once, resolves their overlapping answers into one consistent
//! set of annotations, and rewrites the text with a chosen strategy.
//!
//! ## Architecture
//!
//! - [`anonymization`] - Detectors, span reconciliation, strategies, reports, audit
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration management
//! - [`domain`] - Error and result types
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::anonymization::{AnonymizationEngine, Strategy};
//! use veil::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.toml")?;
//!     let engine = AnonymizationEngine::new(config.anonymization)?;
//!
//!     let result = engine
//!         .anonymize_text("Reach me at jane@example.com", Strategy::Partial)
//!         .await?;
//!
//!     println!("{}", result.anonymized_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Strategies
//!
//! | Strategy      | `jane@example.com`          |
//! |---------------|-----------------------------|
//! | `placeholder` | `[EMAIL_ADDRESS]`           |
//! | `hash`        | `[EMAIL_ADDRESS_3f9a01c2]`  |
//! | `mask`        | `****@*******.***`          |
//! | `partial`     | `ja***@example.com`         |
//! | `adaptive`    | per-type choice of the above |
//!
//! Within one call, equal values (after whitespace and case normalization)
//! always receive the same replacement.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`]. Detector failures never
//! surface as errors; the detector is reported as unavailable and the
//! request continues with the remaining detectors.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
