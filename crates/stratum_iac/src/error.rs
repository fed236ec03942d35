//! Error types for IaC module.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while loading Terraform from disk.
///
/// Validating text never fails; only reading configuration does.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Terraform directory not found: {0}")]
    NotFound(PathBuf),

    #[error("No .tf files found in {0}")]
    NoConfiguration(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
