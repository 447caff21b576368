//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_RUNTIME_ERROR, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            eprintln!("❌ Configuration file already exists: {}", self.output);
            eprintln!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::default_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set VEIL_HASH_SALT in .env to keep hash replacements stable across runs");
                println!("  3. Validate configuration: veil validate-config");
                println!("  4. Run: echo 'Mail jane@example.com' | veil anonymize");
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("❌ Failed to write configuration file");
                eprintln!("   Error: {e}");
                Ok(EXIT_RUNTIME_ERROR)
            }
        }
    }

    /// Commented configuration with every default spelled out
    pub(crate) fn default_config() -> &'static str {
        r#"# Veil Configuration File
# PII detection and anonymization

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Console logs always go to stderr; this adds a JSON file layer
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# adaptive | hash | placeholder | mask | partial
strategy = "adaptive"

# Secret salt for the hash strategy; random per process when unset
# hash_salt = "${VEIL_HASH_SALT}"

# Number placeholders by first appearance: [EMAIL_ADDRESS_1], [EMAIL_ADDRESS_2]
placeholder_numbering = false

# Detections below this confidence are discarded (0.0 - 1.0)
min_confidence = 0.0

# Per-detector time budget; slower detectors are skipped for the request
detector_timeout_ms = 5000

# Custom pattern library (built-in library when unset)
# pattern_library = "./patterns/custom.toml"

[anonymization.reconciler]
# confidence_first | priority_first
tie_break = "confidence_first"
# Merge same-label detections separated by at most this much whitespace (0 = off)
coalesce_gap = 1

[anonymization.regex]
enabled = true

# Remote model servers (POST {endpoint}/infer)
# [[anonymization.remote]]
# name = "spacy"
# endpoint = "http://localhost:8080"
# source = "ner"            # ner | framework
# api_key = "${VEIL_NER_API_KEY}"
# timeout_ms = 2000
# enabled = true

[anonymization.audit]
enabled = false
log_path = "./audit/veil.log"
json_format = true
"#
    }
}
