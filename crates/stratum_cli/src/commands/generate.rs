//! Generate command - Run the full pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stratum_core::{InfraBundle, Pipeline};
use stratum_cost::PricingTable;
use stratum_intent::{IntentSource, KeywordIntentSource};
use stratum_policy::SecurityAnalyzer;

use super::output::{print_cost, print_json, print_security, print_validation};
use super::{load_intent, with_region, CliError, OutputFormat};

#[derive(Args)]
pub struct GenerateArgs {
    /// Free-text description of the infrastructure
    #[arg(short, long, conflicts_with = "intent")]
    describe: Option<String>,

    /// Intent JSON file (defaults apply to missing fields)
    #[arg(short, long)]
    intent: Option<PathBuf>,

    /// Directory to write main.tf and report.json into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// YAML pricing overrides
    #[arg(long, env = "STRATUM_PRICING")]
    pricing: Option<PathBuf>,

    /// YAML security rule overrides
    #[arg(long, env = "STRATUM_POLICY")]
    policy: Option<PathBuf>,

    /// Region override
    #[arg(long, env = "STRATUM_REGION")]
    region: Option<String>,

    /// Exit with code 3 when the generated code fails validation
    #[arg(long)]
    strict: bool,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let pricing = PricingTable::load(args.pricing.as_deref()).context("Failed to load pricing")?;
    let analyzer = SecurityAnalyzer::load(args.policy.as_deref())
        .context("Failed to load security rule overrides")?;
    let pipeline = Pipeline::new()?.with_pricing(pricing).with_analyzer(analyzer);

    let intent = match &args.describe {
        Some(text) => {
            if text.trim().is_empty() {
                return Err(CliError::InvalidArgs("--describe text is empty".to_string()).into());
            }
            let source = KeywordIntentSource::new();
            info!("Extracting intent with {}", source.name());
            let intent = source.produce_intent(text).await?;
            with_region(intent, args.region.as_deref())
        }
        None => load_intent(args.intent.as_deref(), args.region.as_deref())?,
    };

    let bundle = pipeline.run(&intent).context("Failed to generate infrastructure")?;

    if let Some(dir) = &args.output {
        write_bundle(dir, &bundle)?;
    }

    match args.format {
        OutputFormat::Json => print_json(&bundle)?,
        OutputFormat::Text => {
            match &args.output {
                Some(dir) => println!("📁 Wrote main.tf and report.json to {}", dir.display()),
                None => println!("{}", bundle.code()),
            }
            println!();
            print_validation(&bundle.validation);
            println!();
            print_cost(&bundle.cost);
            println!();
            print_security(&bundle.security);
        }
    }

    if args.strict && !bundle.validation.valid {
        return Err(CliError::ValidationFailed {
            errors: bundle.validation.errors.len(),
        }
        .into());
    }
    Ok(())
}

/// Write `main.tf` and `report.json` into `dir`, creating it if needed.
fn write_bundle(dir: &Path, bundle: &InfraBundle) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(dir.join("main.tf"), bundle.code())
        .with_context(|| format!("Failed to write {}", dir.join("main.tf").display()))?;
    fs::write(dir.join("report.json"), bundle.report_json()?)
        .with_context(|| format!("Failed to write {}", dir.join("report.json").display()))?;
    info!("Wrote bundle to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_intent::Intent;
    use tempfile::tempdir;

    #[test]
    fn test_write_bundle() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out");
        let bundle = Pipeline::new().unwrap().run(&Intent::default()).unwrap();

        write_bundle(&target, &bundle).unwrap();

        let code = fs::read_to_string(target.join("main.tf")).unwrap();
        assert_eq!(code, bundle.code());
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(target.join("report.json")).unwrap()).unwrap();
        assert_eq!(report["validation"]["valid"], true);
        assert!(report.get("code").is_none());
    }
}
