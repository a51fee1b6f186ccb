//! Application error types

use docforge_domain::DomainError;
use thiserror::Error;

use crate::ports::BackendError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A backend call failed.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// No template with this id is loaded.
    #[error("template not found: {0}")]
    NotFound(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
