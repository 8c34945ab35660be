//! Error types for session persistence and selector tables.

use thiserror::Error;
use webgrit_core::ErrorKind;

/// Errors from session persistence and restore.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session stored under the requested name.
    #[error("session not found: {0}")]
    NotFound(String),

    /// Session name would escape the store directory.
    #[error("invalid session name: {0}")]
    InvalidName(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A browser operation failed during capture or restore.
    #[error("browser error: {0}")]
    Browser(#[from] ErrorKind),
}

/// Errors loading a selector keyword table from disk.
#[derive(Debug, Error)]
pub enum SelectorTableError {
    /// IO error reading the table file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The table file is not a JSON object of string lists.
    #[error("invalid selector table: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl SessionError {
    /// The taxonomy kind for this error, for uniform surfacing.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(name) => ErrorKind::NotFound(name.clone()),
            Self::Browser(kind) => kind.clone(),
            Self::Serialization(e) => ErrorKind::Parse(e.to_string()),
            Self::InvalidName(name) => ErrorKind::NotFound(name.clone()),
            Self::Io(e) => ErrorKind::Network(e.to_string()),
        }
    }
}
