//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        if !Path::new(config_path).exists() {
            println!("   (file not found, checking built-in defaults)");
        }
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let anonymization = &config.anonymization;
        let registry = match anonymization.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let pattern_count = match registry {
            Ok(registry) => registry.all_patterns().len(),
            Err(e) => {
                println!("❌ Pattern library could not be loaded");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Strategy: {}", anonymization.strategy);
        println!("  Tie Break: {}", anonymization.reconciler.tie_break);
        println!("  Coalesce Gap: {}", anonymization.reconciler.coalesce_gap);
        println!("  Min Confidence: {}", anonymization.min_confidence);
        println!("  Detector Timeout: {}ms", anonymization.detector_timeout_ms);
        println!(
            "  Hash Salt: {}",
            if anonymization.hash_salt.is_some() {
                "configured"
            } else {
                "random per process"
            }
        );
        println!(
            "  Regex Detector: {} ({pattern_count} patterns)",
            if anonymization.regex.enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        for remote in &anonymization.remote {
            println!(
                "  Remote Detector: {} [{}] {} ({})",
                remote.name,
                remote.source,
                remote.endpoint,
                if remote.enabled { "enabled" } else { "disabled" }
            );
        }
        println!(
            "  Audit Log: {}",
            if anonymization.audit.enabled {
                anonymization.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();

        Ok(EXIT_SUCCESS)
    }
}
