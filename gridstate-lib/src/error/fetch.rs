//! Remote fetch error types

use std::time::Duration;

/// Errors reported by a fetch collaborator.
///
/// Fetch failures are expected and recoverable. Tables surface them through
/// their `error()` accessor and never panic on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The data source reported a failure.
    #[error("Fetch failed: {message}")]
    Remote { message: String },

    /// The data source answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The collaborator gave up waiting.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The request was cancelled before completing.
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a new remote failure.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates a new status failure.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Returns the status code, if this is a status failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The outcome of an asynchronous fetch.
pub type AsyncOutcome<T> = Result<T, FetchError>;
