//! Audit logging module
//!
//! Records each anonymization request with hashed values only.

pub mod logger;

pub use logger::AuditLogger;
