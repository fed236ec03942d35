//! Optimization tips.
//!
//! Tips are an ordered threshold table read against totals that have already
//! been computed. Nothing here changes a number on the estimate.

use stratum_intent::{Availability, Intent, InstanceType};

use crate::pricing::PricingTable;

/// Everything a tip may look at.
#[derive(Debug, Clone, Copy)]
pub struct TipFacts<'a> {
    pub intent: &'a Intent,
    pub pricing: &'a PricingTable,
    pub monthly_cost: f64,
    /// Compute and database instance cost.
    pub instance_cost: f64,
    pub resource_count: usize,
}

/// One advisory rule.
#[derive(Debug, Clone, Copy)]
pub struct CostTip {
    pub id: &'static str,
    pub applies: fn(&TipFacts<'_>) -> bool,
    pub message: fn(&TipFacts<'_>) -> String,
}

/// Monthly spend above which reserved capacity is suggested.
pub const RESERVED_THRESHOLD: f64 = 50.0;
/// Monthly spend above which spot capacity is suggested.
pub const SPOT_THRESHOLD: f64 = 100.0;
/// Resource count above which cost allocation tags are suggested.
pub const TAGGING_THRESHOLD: usize = 15;

/// The built-in tip table, in evaluation order.
pub const COST_TIPS: &[CostTip] = &[
    CostTip {
        id: "free-tier-size",
        applies: |f| !f.intent.instance_type().is_free_tier(),
        message: |f| {
            let current = f.pricing.monthly_rate(f.intent.instance_type());
            let micro = f.pricing.monthly_rate(InstanceType::T3Micro);
            format!(
                "Switch to t3.micro for better price/performance (save ~{}{:.2}/month per instance)",
                f.pricing.currency,
                (current - micro).max(0.0)
            )
        },
    },
    CostTip {
        id: "auto-scaling",
        applies: |f| f.intent.app_count() > 2,
        message: |_| {
            "Use an auto-scaling group to scale instance count with demand".to_string()
        },
    },
    CostTip {
        id: "single-instance-load-balancer",
        applies: |f| f.intent.load_balancer() && f.intent.app_count() == 1,
        message: |f| {
            format!(
                "Consider removing the load balancer for a single instance (save ~{}{:.2}/month)",
                f.pricing.currency,
                f.pricing.load_balancer_monthly()
            )
        },
    },
    CostTip {
        id: "high-availability-without-load-balancer",
        applies: |f| f.intent.availability() == Availability::High && !f.intent.load_balancer(),
        message: |f| {
            format!(
                "Add a load balancer to spread traffic across the {} redundant instances",
                f.intent.app_count()
            )
        },
    },
    CostTip {
        id: "reserved-instances",
        applies: |f| f.monthly_cost > RESERVED_THRESHOLD,
        message: |f| {
            format!(
                "Use Reserved Instances (1-year) to save ~{}{:.2}/month ({:.0}% discount)",
                f.pricing.currency,
                f.monthly_cost * f.pricing.reserved_discount,
                f.pricing.reserved_discount * 100.0
            )
        },
    },
    CostTip {
        id: "spot-instances",
        applies: |f| f.monthly_cost > SPOT_THRESHOLD,
        message: |f| {
            format!(
                "Consider Spot Instances for dev/test (save up to {}{:.2}/month, {:.0}% discount)",
                f.pricing.currency,
                f.instance_cost * f.pricing.spot_discount,
                f.pricing.spot_discount * 100.0
            )
        },
    },
    CostTip {
        id: "cost-allocation-tags",
        applies: |f| f.resource_count > TAGGING_THRESHOLD,
        message: |f| {
            format!(
                "Tag the {} resources for cost allocation to track spend per component",
                f.resource_count
            )
        },
    },
];

/// Messages of every applicable tip, in table order.
pub fn collect_tips(facts: &TipFacts<'_>) -> Vec<String> {
    COST_TIPS
        .iter()
        .filter(|tip| (tip.applies)(facts))
        .map(|tip| (tip.message)(facts))
        .collect()
}
