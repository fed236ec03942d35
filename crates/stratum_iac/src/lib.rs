//! # stratum_iac
//!
//! Structural validation of Terraform code for Stratum.
//!
//! This crate handles pattern-based inspection of generated configuration.
//! It never executes Terraform and never parses HCL as a grammar.
//!
//! ## Features
//!
//! - Fatal structural checks (terraform block, provider, resources, braces)
//! - Best-practice warnings (security groups, VPC, hardcoded credentials)
//! - Informational suggestions (free tier sizes, resource count)
//! - [`CodeScan`], the shared view used by the security analyzer
//!
//! ## Example
//!
//! ```rust
//! use stratum_iac::StructuralValidator;
//!
//! let result = StructuralValidator::new().validate("resource \"aws_vpc\" \"main\" {");
//! assert!(!result.valid);
//! assert_eq!(result.resource_count, 1);
//! ```

pub mod error;
pub mod scan;
pub mod validator;

pub use error::{IacError, IacResult};
pub use scan::{CodeScan, ResourceBlock, ADMIN_PORTS, FREE_TIER_SIZES};
pub use validator::{RuleSeverity, StructuralRule, StructuralValidator, ValidationResult, STRUCTURAL_RULES};
