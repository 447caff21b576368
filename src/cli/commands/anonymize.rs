//! Anonymize command implementation
//!
//! Reads text from a file or stdin, runs detection and anonymization, and
//! writes the result in the requested format. Logs go to stderr so stdout
//! carries only the output.

use super::{exit_code_for, read_input, write_output, DetectorSelection};
use crate::anonymization::report::{export, OutputFormat};
use crate::anonymization::{AnonymizationEngine, AnonymizationResult, Strategy};
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_RUNTIME_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Arguments for the anonymize command
#[derive(Args, Debug, Default)]
pub struct AnonymizeArgs {
    /// Strategy (adaptive, hash, placeholder, mask, partial); config default when omitted
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Detectors to run
    #[arg(long, value_enum, default_value_t = DetectorSelection::All)]
    pub detectors: DetectorSelection,

    /// Input file (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (text, json, csv, summary)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Print processing metrics to stderr
    #[arg(long)]
    pub metrics: bool,

    /// Anonymize stdin line by line until EOF or Ctrl+C
    #[arg(long)]
    pub interactive: bool,

    /// Suppress informational messages on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let strategy = match self.strategy.as_deref() {
            Some(name) => match name.parse::<Strategy>() {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            },
            None => config.anonymization.strategy,
        };

        let format = match self.format.parse::<OutputFormat>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        self.detectors.apply(&mut config.anonymization);

        let engine = match AnonymizationEngine::new(config.anonymization) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create anonymization engine");
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        tracing::info!(
            strategy = %strategy,
            detectors = ?engine.detector_names(),
            format = %format,
            "Anonymization engine initialized"
        );

        if self.interactive {
            return self.run_interactive(&engine, strategy, shutdown_signal).await;
        }

        let text = match read_input(self.input.as_deref()) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return Ok(EXIT_RUNTIME_ERROR);
            }
        };

        let result = match engine.anonymize_text(&text, strategy).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Anonymization failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let rendered = match export(&result, format) {
            Ok(rendered) => rendered,
            Err(e) => {
                eprintln!("Failed to render output: {e}");
                return Ok(EXIT_RUNTIME_ERROR);
            }
        };

        if let Err(e) = write_output(self.output.as_deref(), &rendered) {
            eprintln!("Failed to write output: {e}");
            return Ok(EXIT_RUNTIME_ERROR);
        }

        self.report(&result);
        Ok(EXIT_SUCCESS)
    }

    async fn run_interactive(
        &self,
        engine: &AnonymizationEngine,
        strategy: Strategy,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        if !self.quiet {
            eprintln!("Interactive mode: enter text, Ctrl+D or Ctrl+C to exit");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match engine.anonymize_text(&line, strategy).await {
                        Ok(result) => {
                            println!("{}", result.anonymized_text);
                            self.report(&result);
                        }
                        Err(e) => {
                            eprintln!("Anonymization failed: {e}");
                            return Ok(exit_code_for(&e));
                        }
                    }
                }
                _ = shutdown_signal.changed() => {
                    tracing::info!("Shutdown requested, leaving interactive mode");
                    break;
                }
            }
        }

        Ok(EXIT_SUCCESS)
    }

    fn report(&self, result: &AnonymizationResult) {
        if !self.quiet && !result.unavailable_detectors.is_empty() {
            eprintln!(
                "Warning: detectors unavailable: {}",
                result.unavailable_detectors.join(", ")
            );
        }

        if self.metrics {
            eprintln!(
                "entities={} distinct={} detection_ms={} anonymization_ms={} total_ms={}",
                result.entities.len(),
                result.replacements.len(),
                result.detection_time_ms,
                result.anonymization_time_ms,
                result.total_time_ms()
            );
        }
    }
}
