use thiserror::Error;

/// Errors raised by a `QueueBackend` implementation.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to parse queue item at {path}: {source}")]
    Retrieval {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("queue storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised at startup when the configured queue DSN is unusable.
#[derive(Debug, Error)]
pub enum InvalidQueueDsn {
    #[error("unsupported queue DSN scheme {0:?}, expected \"file\"")]
    UnsupportedScheme(String),

    #[error("queue DSN {0:?} has no path component")]
    MissingPath(String),
}
