//! Error types for policy module.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors raised while configuring the analyzer. Analysis itself never fails.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Unknown security rule: {0}")]
    UnknownRule(String),

    #[error("Invalid policy configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
