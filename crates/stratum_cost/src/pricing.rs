//! Static pricing model.
//!
//! Every field has a default, so an override file only needs the rates it
//! changes:
//!
//! ```yaml
//! instance_hourly:
//!   t3.medium: 0.05
//! load_balancer_hourly: 0.03
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stratum_intent::InstanceType;

use crate::error::{CostError, CostResult};

/// Supported currencies for cost display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::USD => write!(f, "$"),
            Currency::EUR => write!(f, "€"),
        }
    }
}

/// Rates and usage assumptions behind every estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub currency: Currency,
    /// On-demand hourly rate per instance size.
    pub instance_hourly: BTreeMap<String, f64>,
    pub load_balancer_hourly: f64,
    pub hours_per_month: f64,
    /// Outbound transfer assumed for every deployment.
    pub data_transfer_gb: f64,
    pub data_transfer_free_gb: f64,
    pub data_transfer_per_gb: f64,
    pub metrics_per_instance: u32,
    pub free_metrics: u32,
    pub metric_monthly: f64,
    /// Most app instances that still count as free tier.
    pub free_tier_unit_cap: u32,
    pub reserved_discount: f64,
    pub spot_discount: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        let instance_hourly = [
            (InstanceType::T2Micro, 0.0116),
            (InstanceType::T2Small, 0.023),
            (InstanceType::T3Micro, 0.0104),
            (InstanceType::T3Small, 0.0208),
            (InstanceType::T3Medium, 0.0416),
        ]
        .into_iter()
        .map(|(size, rate)| (size.as_str().to_string(), rate))
        .collect();

        Self {
            currency: Currency::USD,
            instance_hourly,
            load_balancer_hourly: 0.0225,
            hours_per_month: 24.0 * 30.0,
            data_transfer_gb: 100.0,
            data_transfer_free_gb: 10.0,
            data_transfer_per_gb: 0.09,
            metrics_per_instance: 5,
            free_metrics: 10,
            metric_monthly: 0.30,
            free_tier_unit_cap: 2,
            reserved_discount: 0.35,
            spot_discount: 0.70,
        }
    }
}

impl PricingTable {
    /// Parse an override document. Missing fields keep their defaults;
    /// missing sizes keep their default rate.
    pub fn from_yaml_str(content: &str) -> CostResult<Self> {
        let mut table: PricingTable = serde_yaml::from_str(content)?;
        let defaults = PricingTable::default();
        for (size, rate) in defaults.instance_hourly {
            table.instance_hourly.entry(size).or_insert(rate);
        }
        table.check()?;
        debug!("Parsed pricing table with {} instance rates", table.instance_hourly.len());
        Ok(table)
    }

    /// Load an override file.
    pub fn from_file(path: &Path) -> CostResult<Self> {
        if !path.exists() {
            return Err(CostError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let table = Self::from_yaml_str(&content)?;
        info!("Loaded pricing overrides from {:?}", path);
        Ok(table)
    }

    /// Load from `path` when given, otherwise use the built-in rates.
    pub fn load(path: Option<&Path>) -> CostResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Hourly rate for a size. Unpriced sizes fall back to t2.micro.
    pub fn hourly_rate(&self, size: InstanceType) -> f64 {
        self.instance_hourly
            .get(size.as_str())
            .or_else(|| self.instance_hourly.get(InstanceType::default().as_str()))
            .copied()
            .unwrap_or_default()
    }

    /// Monthly cost of running one instance of `size`.
    pub fn monthly_rate(&self, size: InstanceType) -> f64 {
        self.hourly_rate(size) * self.hours_per_month
    }

    pub fn load_balancer_monthly(&self) -> f64 {
        self.load_balancer_hourly * self.hours_per_month
    }

    fn check(&self) -> CostResult<()> {
        let scalars = [
            ("load_balancer_hourly", self.load_balancer_hourly),
            ("hours_per_month", self.hours_per_month),
            ("data_transfer_gb", self.data_transfer_gb),
            ("data_transfer_free_gb", self.data_transfer_free_gb),
            ("data_transfer_per_gb", self.data_transfer_per_gb),
            ("metric_monthly", self.metric_monthly),
            ("reserved_discount", self.reserved_discount),
            ("spot_discount", self.spot_discount),
        ];
        let rates = self
            .instance_hourly
            .iter()
            .map(|(size, rate)| (size.as_str(), *rate));

        for (name, value) in scalars.into_iter().chain(rates) {
            if !value.is_finite() || value < 0.0 {
                return Err(CostError::InvalidPricing(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.reserved_discount > 1.0 || self.spot_discount > 1.0 {
            return Err(CostError::InvalidPricing(
                "discounts are fractions between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
