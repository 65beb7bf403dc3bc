//! Error types for grant fetching.

use thiserror::Error;

/// Errors a [`GrantSource`](crate::traits::GrantSource) can report.
///
/// All variants are fail-closed for guard purposes; they differ only in
/// user-facing treatment (`Unauthorized` redirects to re-authentication,
/// the others surface a retry affordance).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure: connection refused, timeout, malformed body.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The endpoint answered with a non-success status other than 401.
    #[error("permission endpoint returned status {status}")]
    Server { status: u16 },

    /// The session is expired or absent (401).
    #[error("session expired or missing")]
    Unauthorized,
}

/// Result type for grant fetching.
pub type FetchResult<T> = Result<T, FetchError>;
