//! # stratum_policy
//!
//! Security posture analysis for Stratum.
//!
//! This crate provides:
//! - **Security Rules**: an ordered table of checks, each with a fixed deduction
//! - **Security Analyzer**: runs every rule once and scores from 100 down
//! - **Security Report**: score, level, findings, recommendations and a
//!   per-rule compliance checklist
//! - **Rule Overrides**: YAML adjustments to disable rules or change deductions
//!
//! ## Example
//!
//! ```rust
//! use stratum_intent::Intent;
//! use stratum_policy::{SecurityAnalyzer, SecurityLevel};
//!
//! let report = SecurityAnalyzer::new().analyze(&Intent::default(), "");
//! assert_eq!(report.score, 40);
//! assert_eq!(report.level, SecurityLevel::NeedsImprovement);
//! assert_eq!(report.compliance["security_groups"], false);
//! ```

pub mod analyzer;
pub mod error;
pub mod report;
pub mod rules;

pub use analyzer::{SecurityAnalyzer, BASE_SCORE};
pub use error::{PolicyError, PolicyResult};
pub use report::{Finding, FindingKind, SecurityLevel, SecurityReport, Severity};
pub use rules::{RuleOverrides, SecurityRule, Verdict, SECURITY_RULES};
