//! Cost Estimation - Transparent, explainable monthly bills.
//!
//! An estimate is a list of bill rows priced from a [`PricingTable`]. The
//! label breakdown, category totals, free-tier flag, tips and savings are all
//! derived from those rows after they are priced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stratum_intent::Intent;

use crate::pricing::{Currency, PricingTable};
use crate::tips::{collect_tips, TipFacts, RESERVED_THRESHOLD};

/// Round an amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Billing category of a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Compute,
    Database,
    Networking,
    Monitoring,
}

impl CostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Compute => "Compute",
            CostCategory::Database => "Database",
            CostCategory::Networking => "Networking",
            CostCategory::Monitoring => "Monitoring",
        }
    }
}

/// One row of the estimated bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Label used in the breakdown map
    pub service: String,
    pub specification: String,
    pub category: CostCategory,
    pub quantity: f64,
    pub unit_price: f64,
    /// Monthly total, rounded to cents
    pub total: f64,
    pub free_tier: bool,
}

impl LineItem {
    fn new(service: impl Into<String>, category: CostCategory, quantity: f64, unit_price: f64) -> Self {
        Self {
            service: service.into(),
            specification: String::new(),
            category,
            quantity,
            unit_price,
            total: round_cents(quantity * unit_price),
            free_tier: false,
        }
    }

    fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = specification.into();
        self
    }

    fn free_tier(mut self, free_tier: bool) -> Self {
        self.free_tier = free_tier;
        self
    }

    /// Unrounded monthly amount
    fn exact(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A discount program the deployment could use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOpportunity {
    pub program: String,
    pub savings_percentage: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SavingsOpportunity {
    fn new(program: &str, discount: f64, base: f64) -> Self {
        Self {
            program: program.to_string(),
            savings_percentage: round_cents(discount * 100.0),
            monthly_savings: round_cents(base * discount),
            annual_savings: round_cents(base * discount * 12.0),
            note: None,
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Complete monthly estimate for one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub currency: Currency,
    pub region: String,
    pub monthly_cost: f64,
    pub annual_cost: f64,
    /// Line-item label to monthly amount
    pub breakdown: BTreeMap<String, f64>,
    pub free_tier_eligible: bool,
    pub optimization_tips: Vec<String>,
    pub line_items: Vec<LineItem>,
    /// Category name to monthly amount
    pub category_breakdown: BTreeMap<String, f64>,
    pub savings: Vec<SavingsOpportunity>,
}

impl CostEstimate {
    /// Format as human-readable string
    pub fn format_total(&self) -> String {
        format!("{}{:.2}/mo", self.currency, self.monthly_cost)
    }

    /// Amount for a breakdown label, zero when absent.
    pub fn line(&self, label: &str) -> f64 {
        self.breakdown.get(label).copied().unwrap_or_default()
    }
}

/// Prices intents against a fixed table.
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    pricing: PricingTable,
}

impl CostEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pricing(pricing: PricingTable) -> Self {
        Self { pricing }
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Price one intent. `resource_count` comes from validation of the
    /// generated code.
    pub fn estimate(&self, intent: &Intent, resource_count: usize) -> CostEstimate {
        let pricing = &self.pricing;
        let size = intent.instance_type();
        let apps = intent.app_count();
        let instance_monthly = pricing.monthly_rate(size);

        let mut items = vec![LineItem::new(
            format!("EC2 ({}) x{}", size, apps),
            CostCategory::Compute,
            f64::from(apps),
            instance_monthly,
        )
        .with_specification(format!("{}x {} application instances", apps, size))
        .free_tier(size.is_free_tier() && apps <= pricing.free_tier_unit_cap)];

        if intent.has_database() {
            items.push(
                LineItem::new(
                    format!("EC2 database ({})", intent.database()),
                    CostCategory::Database,
                    1.0,
                    instance_monthly,
                )
                .with_specification(format!("1x {} self-managed", size))
                .free_tier(size.is_free_tier()),
            );
        }

        if intent.load_balancer() {
            items.push(
                LineItem::new(
                    "Application Load Balancer (ALB)",
                    CostCategory::Networking,
                    1.0,
                    pricing.load_balancer_monthly(),
                )
                .with_specification(format!("HTTP listener, {} targets", apps)),
            );
        }

        let billable_gb = (pricing.data_transfer_gb - pricing.data_transfer_free_gb).max(0.0);
        items.push(
            LineItem::new(
                format!("Data Transfer ({}GB)", pricing.data_transfer_gb),
                CostCategory::Networking,
                billable_gb,
                pricing.data_transfer_per_gb,
            )
            .with_specification(format!(
                "{}GB outbound (first {}GB free)",
                billable_gb, pricing.data_transfer_free_gb
            ))
            .free_tier(billable_gb == 0.0),
        );

        let metrics = pricing
            .metrics_per_instance
            .saturating_mul(intent.instance_count())
            .saturating_sub(pricing.free_metrics);
        items.push(
            LineItem::new(
                "CloudWatch Metrics",
                CostCategory::Monitoring,
                f64::from(metrics),
                pricing.metric_monthly,
            )
            .with_specification(format!(
                "{} billable metrics ({} free)",
                metrics, pricing.free_metrics
            ))
            .free_tier(metrics == 0),
        );

        items.push(
            LineItem::new("VPC & Networking", CostCategory::Networking, 1.0, 0.0)
                .with_specification(format!("{} declared resources", resource_count))
                .free_tier(true),
        );

        let exact_monthly: f64 = items.iter().map(LineItem::exact).sum();
        let instance_cost: f64 = items
            .iter()
            .filter(|i| matches!(i.category, CostCategory::Compute | CostCategory::Database))
            .map(LineItem::exact)
            .sum();
        let monthly_cost = round_cents(exact_monthly);

        let breakdown = items
            .iter()
            .map(|i| (i.service.clone(), i.total))
            .collect();

        let mut categories: BTreeMap<String, f64> = BTreeMap::new();
        for item in &items {
            *categories.entry(item.category.as_str().to_string()).or_default() += item.exact();
        }
        let category_breakdown = categories
            .into_iter()
            .map(|(k, v)| (k, round_cents(v)))
            .collect();

        let optimization_tips = collect_tips(&TipFacts {
            intent,
            pricing,
            monthly_cost,
            instance_cost,
            resource_count,
        });

        let mut savings = Vec::new();
        if monthly_cost > RESERVED_THRESHOLD {
            savings.push(SavingsOpportunity::new(
                "reserved_instances",
                pricing.reserved_discount,
                monthly_cost,
            ));
        }
        savings.push(
            SavingsOpportunity::new("spot_instances", pricing.spot_discount, instance_cost)
                .with_note("For dev/test environments only"),
        );

        debug!("Priced {} line items", items.len());
        info!(
            "Estimated {}{:.2}/month for {} app instance(s)",
            pricing.currency, monthly_cost, apps
        );

        CostEstimate {
            currency: pricing.currency,
            region: intent.region().to_string(),
            monthly_cost,
            annual_cost: round_cents(monthly_cost * 12.0),
            breakdown,
            free_tier_eligible: size.is_free_tier() && apps <= pricing.free_tier_unit_cap,
            optimization_tips,
            line_items: items,
            category_breakdown,
            savings,
        }
    }
}
