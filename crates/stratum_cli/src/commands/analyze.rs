//! Analyze command - Security score for an intent and its Terraform.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stratum_policy::SecurityAnalyzer;

use super::output::{print_json, print_security};
use super::{load_intent, read_input, OutputFormat};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Terraform file to analyze
    #[arg(short, long)]
    code: PathBuf,

    /// Intent JSON file the code was generated from
    #[arg(short, long)]
    intent: Option<PathBuf>,

    /// YAML security rule overrides
    #[arg(long, env = "STRATUM_POLICY")]
    policy: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let intent = load_intent(args.intent.as_deref(), None)?;
    let code = read_input(&args.code)?;
    let analyzer = SecurityAnalyzer::load(args.policy.as_deref())
        .context("Failed to load security rule overrides")?;

    let report = analyzer.analyze(&intent, &code);

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_security(&report),
    }
    Ok(())
}
