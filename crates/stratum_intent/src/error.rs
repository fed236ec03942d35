//! Error types for the intent module.

use thiserror::Error;

/// Result type alias for intent operations.
pub type IntentResult<T> = Result<T, IntentError>;

/// Errors that can occur while producing an intent.
///
/// None of these reach the pipeline: extraction falls back to keyword
/// matching, and a normalized [`crate::Intent`] is always total.
#[derive(Error, Debug)]
pub enum IntentError {
    #[error("Completion backend failed: {0}")]
    Backend(String),

    #[error("Completion backend returned no JSON object: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
