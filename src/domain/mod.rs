//! Domain error and result types for Veil.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Result, VeilError};
//! use veil::anonymization::Strategy;
//!
//! fn example() -> Result<Strategy> {
//!     // Unknown strategy names are rejected with VeilError::UnknownStrategy
//!     let strategy: Strategy = "mask".parse()?;
//!     Ok(strategy)
//! }
//! ```
//!
//! Detector failures use the separate [`DetectorError`] so the fan-out layer
//! can degrade them into empty contributions.

pub mod errors;
pub mod result;

pub use errors::{DetectorError, VeilError};
pub use result::Result;
