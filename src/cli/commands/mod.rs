//! CLI command implementations

pub mod anonymize;
pub mod detect;
pub mod init;
pub mod validate;

use crate::anonymization::AnonymizationConfig;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_RUNTIME_ERROR};
use crate::domain::VeilError;
use clap::ValueEnum;
use std::io::Read;
use std::path::Path;

/// Which detectors a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DetectorSelection {
    /// Regex library plus every enabled remote detector
    #[default]
    All,
    /// Regex library only
    Regex,
    /// Remote detectors only
    Remote,
}

impl DetectorSelection {
    /// Restrict `config` to the selected detectors
    pub fn apply(self, config: &mut AnonymizationConfig) {
        match self {
            Self::All => {}
            Self::Regex => {
                config.regex.enabled = true;
                config.remote.iter_mut().for_each(|r| r.enabled = false);
            }
            Self::Remote => config.regex.enabled = false,
        }
    }
}

/// Map a library error to a process exit code
pub(crate) fn exit_code_for(error: &VeilError) -> i32 {
    match error {
        VeilError::Configuration(_)
        | VeilError::UnknownStrategy(_)
        | VeilError::UnknownPiiType(_)
        | VeilError::Validation(_) => EXIT_CONFIG_ERROR,
        _ => EXIT_RUNTIME_ERROR,
    }
}

/// Read the whole input from a file, or stdin when no path is given
pub(crate) fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write output to a file, or stdout when no path is given
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, content),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()
        }
    }
}
