//! Validate command - Structural checks on existing Terraform.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use stratum_iac::{IacError, StructuralValidator};

use super::output::{print_json, print_validation};
use super::{read_input, CliError, OutputFormat};

#[derive(Args)]
pub struct ValidateArgs {
    /// A .tf file, or a directory whose .tf files form one configuration
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Exit with code 3 when structural errors are found
    #[arg(long)]
    strict: bool,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating {}", args.path.display());

    let validator = StructuralValidator::new();
    let result = if args.path.is_dir() {
        validator
            .validate_dir(&args.path)
            .map_err(|e| -> anyhow::Error {
                match e {
                    IacError::NotFound(path) => CliError::NotFound(path).into(),
                    IacError::NoConfiguration(path) => CliError::InvalidArgs(format!(
                        "no .tf files found in {}",
                        path.display()
                    ))
                    .into(),
                    IacError::Io(err) => anyhow::Error::new(err).context("Failed to read Terraform directory"),
                }
            })?
    } else {
        validator.validate(&read_input(&args.path)?)
    };

    match args.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => print_validation(&result),
    }

    if args.strict && !result.valid {
        return Err(CliError::ValidationFailed {
            errors: result.errors.len(),
        }
        .into());
    }
    Ok(())
}
