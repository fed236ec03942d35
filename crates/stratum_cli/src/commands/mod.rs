//! CLI command definitions.
//!
//! This module defines the command structure for the Stratum CLI.
//! Each subcommand runs one or all of the pipeline stages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::debug;

use stratum_intent::{Intent, IntentBuilder, RawIntent};

pub mod analyze;
pub mod estimate;
pub mod generate;
pub mod output;
pub mod validate;

/// Stratum - infrastructure-as-code from a structured intent
#[derive(Parser)]
#[command(name = "stratum")]
#[command(version, about = "Stratum - Terraform, cost and security reports from a structured intent")]
#[command(long_about = r#"
Stratum turns an infrastructure request into Terraform for AWS, then
validates the code, estimates its monthly bill and scores its security.

COMMANDS:
  generate  → Full pipeline from a description or an intent file
  validate  → Structural checks on existing Terraform
  analyze   → Security score for an intent and its code
  estimate  → Monthly bill for an intent

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure (with --strict)
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Terraform plus validation, cost and security reports
    Generate(generate::GenerateArgs),

    /// Validate a Terraform file or directory
    Validate(validate::ValidateArgs),

    /// Score the security of an intent and its Terraform
    Analyze(analyze::AnalyzeArgs),

    /// Estimate the monthly cost of an intent
    Estimate(estimate::EstimateArgs),
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Failures that map to specific exit codes.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Validation failed with {errors} error(s)")]
    ValidationFailed { errors: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgs(String),

    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Read a text file, reporting a missing path as an argument error.
pub fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()).into());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Load an intent file, or the default intent when none is given, then
/// apply a region override.
pub fn load_intent(path: Option<&Path>, region: Option<&str>) -> Result<Intent> {
    let intent = match path {
        Some(path) => {
            let content = read_input(path)?;
            let raw: RawIntent = serde_json::from_str(&content).map_err(|e| {
                CliError::InvalidArgs(format!("{} is not an intent document: {}", path.display(), e))
            })?;
            debug!("Loaded intent from {}", path.display());
            Intent::from(raw)
        }
        None => Intent::default(),
    };
    Ok(with_region(intent, region))
}

/// Replace the region of a resolved intent.
pub fn with_region(intent: Intent, region: Option<&str>) -> Intent {
    match region {
        Some(region) => IntentBuilder::from(&intent).region(region).build(),
        None => intent,
    }
}
