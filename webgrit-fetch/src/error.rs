//! Fetch configuration errors.

use thiserror::Error;

/// Configuration problems surfaced before any scheduling begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Concurrency limit of zero would silently run nothing.
    #[error("concurrency limit must be greater than zero")]
    ZeroConcurrency,

    /// A retrying request needs a positive backoff base.
    #[error("retry base delay must be greater than zero for {url}")]
    ZeroBaseDelay {
        /// URL of the offending request.
        url: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}
