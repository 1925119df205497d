//! Error types for issue tracker access.

use thiserror::Error;

/// Errors raised while talking to the issue tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Tracker answered with a non-success status.
    #[error("request for {resource} returned {reason} ({status})")]
    Request {
        /// Human readable name of the requested resource, e.g. `issue ABC-1`
        resource: String,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No tracker is configured to answer the lookup.
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// Result type for issue tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
