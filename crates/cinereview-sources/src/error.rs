use thiserror::Error;

/// Failure talking to the remote backend
///
/// Every variant is a transport-level failure from the point of view of the
/// review core: it is surfaced to the caller unchanged and never retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{operation} returned HTTP {status}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} was not found")]
    NotFound(String),

    #[error("rejected by the server: {0}")]
    Rejected(String),

    #[error("unexpected response from {operation}: {message}")]
    Unexpected {
        operation: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn unexpected(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unexpected {
            operation,
            message: message.into(),
        }
    }

    /// Whether the backend explicitly reported the target as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}
