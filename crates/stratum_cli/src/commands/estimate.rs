//! Estimate command - Monthly bill for an intent.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stratum_core::Pipeline;
use stratum_cost::{CostEstimator, PricingTable};

use super::output::{print_cost, print_json};
use super::{load_intent, OutputFormat};

#[derive(Args)]
pub struct EstimateArgs {
    /// Intent JSON file (defaults apply to missing fields)
    #[arg(short, long)]
    intent: Option<PathBuf>,

    /// Resource count to report; derived from the generated code when omitted
    #[arg(short, long)]
    resources: Option<usize>,

    /// YAML pricing overrides
    #[arg(long, env = "STRATUM_PRICING")]
    pricing: Option<PathBuf>,

    /// Region override
    #[arg(long, env = "STRATUM_REGION")]
    region: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub async fn execute(args: EstimateArgs) -> Result<()> {
    let intent = load_intent(args.intent.as_deref(), args.region.as_deref())?;
    let pricing = PricingTable::load(args.pricing.as_deref()).context("Failed to load pricing")?;

    let resource_count = match args.resources {
        Some(count) => count,
        None => {
            let pipeline = Pipeline::new()?;
            let code = pipeline.engine().expand(&intent)?;
            pipeline.validator().validate(code.code()).resource_count
        }
    };
    info!("Estimating with {} resources", resource_count);

    let estimate = CostEstimator::with_pricing(pricing).estimate(&intent, resource_count);

    match args.format {
        OutputFormat::Json => print_json(&estimate)?,
        OutputFormat::Text => print_cost(&estimate),
    }
    Ok(())
}
