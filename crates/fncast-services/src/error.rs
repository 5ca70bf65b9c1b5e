//! Service error types.

use thiserror::Error;

use fncast_types::FncastError;

/// Errors produced by the trigger adapters in this crate.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The pipeline itself returned an error (only cancellation in practice).
    #[error(transparent)]
    Pipeline(#[from] FncastError),

    /// The ingest queue has no free capacity.
    #[error("queue full: {0}")]
    QueueFull(String),

    /// The ingest queue has no consumer left.
    #[error("queue closed: {0}")]
    QueueClosed(String),

    /// An event-bus notification could not be decoded.
    #[error("invalid notification: {0}")]
    InvalidNotification(String),

    /// Underlying I/O error (bind, accept).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this error reports an observed cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Pipeline(e) if e.is_cancelled())
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ServiceError>;
