//! Error types for cost estimation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for cost operations.
pub type CostResult<T> = Result<T, CostError>;

/// Errors raised while loading a pricing override.
///
/// Estimation itself is infallible.
#[derive(Error, Debug)]
pub enum CostError {
    #[error("Pricing file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid pricing: {0}")]
    InvalidPricing(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
