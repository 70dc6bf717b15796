use thiserror::Error;

/// Errors raised by tracker clients.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request rejected: {0}")]
    InvalidRequest(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
