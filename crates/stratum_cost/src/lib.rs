//! # stratum_cost
//!
//! Monthly bill estimation for Stratum deployments.
//!
//! Estimates come from a static [`PricingTable`], never from a live pricing
//! API, so the same intent always prices the same way.
//!
//! ## Example
//!
//! ```rust
//! use stratum_cost::CostEstimator;
//! use stratum_intent::Intent;
//!
//! let estimate = CostEstimator::new().estimate(&Intent::default(), 10);
//! assert!(estimate.free_tier_eligible);
//! assert_eq!(estimate.annual_cost, 197.4);
//! ```

pub mod error;
pub mod estimate;
pub mod pricing;
pub mod tips;

pub use error::{CostError, CostResult};
pub use estimate::{round_cents, CostCategory, CostEstimate, CostEstimator, LineItem, SavingsOpportunity};
pub use pricing::{Currency, PricingTable};
pub use tips::{collect_tips, CostTip, TipFacts, COST_TIPS};
