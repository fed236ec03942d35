//! Stratum CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure (with `--strict`)
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{CliError, Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let level = if cli.verbose {
        "stratum=debug"
    } else if cli.quiet {
        "stratum=error"
    } else {
        "stratum=info"
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Analyze(args) => commands::analyze::execute(args).await,
        Commands::Estimate(args) => commands::estimate::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(cli_error) = e.downcast_ref::<CliError>() {
        return match cli_error {
            CliError::ValidationFailed { .. } => ExitCodes::VALIDATION_FAILURE,
            CliError::InvalidArgs(_) | CliError::NotFound(_) => ExitCodes::INVALID_ARGS,
        };
    }

    let template_error = e.chain().any(|cause| {
        cause.is::<stratum_templates::TemplateError>()
            || matches!(
                cause.downcast_ref::<stratum_core::CoreError>(),
                Some(stratum_core::CoreError::Template(_))
            )
    });
    if template_error {
        ExitCodes::TEMPLATE_ERROR
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_cli_errors() {
        let err = anyhow::Error::new(CliError::ValidationFailed { errors: 2 });
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);

        let err = anyhow::Error::new(CliError::NotFound("main.tf".into()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_categorize_template_error_through_context() {
        let core = stratum_core::CoreError::Template(stratum_templates::TemplateError::NotFound(
            "compute".to_string(),
        ));
        let err = Err::<(), _>(core).context("Failed to run pipeline").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::TEMPLATE_ERROR);

        let err = anyhow::anyhow!("disk full");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
