//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A header edit addressed a header the template does not declare.
    #[error("unknown header: {0}")]
    UnknownHeader(String),

    /// A parameter value was set for a parameter the template does not declare.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// The analytics feature name is not recognised.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
