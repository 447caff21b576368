//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use crate::anonymization::config::AnonymizationConfig;
use crate::domain::{Result, VeilError};
use serde::{Deserialize, Serialize};

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Detection and anonymization settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any value is invalid
    pub fn validate(&self) -> Result<()> {
        self.application
            .validate()
            .and_then(|_| self.logging.validate())
            .map_err(VeilError::Configuration)?;
        self.anonymization.validate()
    }

    /// Applies `VEIL_*` environment variable overrides
    ///
    /// Variables follow the pattern `VEIL_<SECTION>_<KEY>`, for example
    /// `VEIL_APPLICATION_LOG_LEVEL` or `VEIL_ANONYMIZATION_STRATEGY`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_APPLICATION_LOG_LEVEL") {
            self.application.log_level = val;
        }

        if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ENABLED") {
            self.logging.local_enabled = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_PATH") {
            self.logging.local_path = val;
        }
        if let Ok(val) = std::env::var("VEIL_LOGGING_LOCAL_ROTATION") {
            self.logging.local_rotation = val;
        }

        self.anonymization.apply_env_overrides()
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Logging configuration
///
/// Console output always goes to stderr; the file layer is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
