//! Error types for templates.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
///
/// Every variant is a programming defect in a fragment set. The built-in
/// fragments never produce one for a normalized intent.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid template {name}: {message}")]
    InvalidTemplate { name: String, message: String },

    #[error("Template rendering failed: {0}")]
    RenderingFailed(String),

    #[error("Template context error: {0}")]
    Context(String),
}

impl TemplateError {
    /// Flatten a tera error and its causes into one message.
    pub(crate) fn describe(err: &tera::Error) -> String {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
