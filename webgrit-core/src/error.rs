//! The closed failure taxonomy for fetch and browser operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed fetch or browser operation.
///
/// This is a closed enum matched exhaustively by the retry policy and by
/// error-surfacing code. Adding a variant forces every match site to take
/// a position on whether the new kind is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// TLS certificate or handshake failure.
    #[error("SSL error: {0}")]
    Ssl(String),

    /// No response within the request deadline.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, reset, refused).
    #[error("network error: {0}")]
    Network(String),

    /// A response was received with a non-2xx status.
    #[error("HTTP {status}")]
    Http {
        /// The HTTP status code.
        status: u16,
    },

    /// Response body could not be interpreted as requested.
    #[error("parse error: {0}")]
    Parse(String),

    /// Operation aborted by a caller-supplied cancellation signal.
    #[error("operation cancelled")]
    Cancelled,

    /// Session or selector lookup miss.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ErrorKind {
    /// Returns true if this failure class is expected to sometimes
    /// self-resolve on retry.
    ///
    /// Transient: SSL handshake failures, timeouts, connection-level
    /// failures, HTTP 5xx, and HTTP 429. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Ssl(_) | Self::Timeout | Self::Network(_) => true,
            Self::Http { status } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::Cancelled | Self::NotFound(_) => false,
        }
    }

    /// Short machine-readable label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ssl(_) => "ssl",
            Self::Timeout => "timeout",
            Self::Network(_) => "network",
            Self::Http { .. } => "http",
            Self::Parse(_) => "parse",
            Self::Cancelled => "cancelled",
            Self::NotFound(_) => "not_found",
        }
    }
}
