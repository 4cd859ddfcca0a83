//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
