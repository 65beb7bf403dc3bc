//! Domain error types for permission and navigation operations.

use thiserror::Error;

/// Domain-specific errors for permission and navigation operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A permission token failed validation.
    #[error("invalid permission {value:?}: {reason}")]
    InvalidPermission { value: String, reason: &'static str },

    /// A grant record in a fetched payload failed validation.
    ///
    /// The index refers to the record's position in the payload.
    #[error("malformed grant record at index {index}: {reason}")]
    MalformedGrant { index: usize, reason: String },

    /// A node id did not belong to the navigation tree it was used with.
    #[error("unknown navigation node index {index}")]
    UnknownNode { index: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
