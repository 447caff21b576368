//! Detect command implementation
//!
//! Runs the detectors and reconciler without rewriting anything and prints
//! the resulting annotations as JSON.

use super::{exit_code_for, read_input, write_output, DetectorSelection};
use crate::anonymization::AnonymizationEngine;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_RUNTIME_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the detect command
#[derive(Args, Debug, Default)]
pub struct DetectArgs {
    /// Detectors to run
    #[arg(long, value_enum, default_value_t = DetectorSelection::All)]
    pub detectors: DetectorSelection,

    /// Input file (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting detect command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        self.detectors.apply(&mut config.anonymization);

        let engine = match AnonymizationEngine::new(config.anonymization) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        let text = match read_input(self.input.as_deref()) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return Ok(EXIT_RUNTIME_ERROR);
            }
        };

        let outcome = engine.detect(&text).await;
        tracing::info!(
            annotations = outcome.annotations.len(),
            below_threshold = outcome.below_threshold,
            invalid = outcome.invalid,
            overlapped = outcome.overlapped,
            "Detection complete"
        );

        let rendered = serde_json::to_string_pretty(&outcome)?;
        if let Err(e) = write_output(self.output.as_deref(), &rendered) {
            eprintln!("Failed to write output: {e}");
            return Ok(EXIT_RUNTIME_ERROR);
        }

        Ok(EXIT_SUCCESS)
    }
}
