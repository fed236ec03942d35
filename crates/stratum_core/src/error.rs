//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while producing a bundle.
///
/// Validation failures and security deductions are never errors; they are
/// reported inside the bundle.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Intent error: {0}")]
    Intent(#[from] stratum_intent::IntentError),

    #[error("Template error: {0}")]
    Template(#[from] stratum_templates::TemplateError),

    #[error("Pricing error: {0}")]
    Cost(#[from] stratum_cost::CostError),

    #[error("Policy error: {0}")]
    Policy(#[from] stratum_policy::PolicyError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
