//! Error types for the fncast pipeline.
//!
//! [`FncastError`] covers unexpected faults only. Expected domain failures
//! (a malformed payload) never travel through this type; they are carried
//! as values inside [`ValidationResult`](crate::ValidationResult) and
//! [`InferenceResult`](crate::InferenceResult).

use thiserror::Error;

use crate::stage::PipelineStage;

/// Top-level error type for the fncast pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FncastError {
    // ── Pipeline ─────────────────────────────────────────────────────

    /// The cancellation signal was observed while a stage was running.
    #[error("pipeline cancelled during {stage}")]
    Cancelled {
        /// The stage that observed the cancellation.
        stage: PipelineStage,
    },

    /// A stage implementation failed unexpectedly (backend unreachable, etc.).
    #[error("{stage} stage failed: {message}")]
    Stage {
        /// The failing stage.
        stage: PipelineStage,
        /// Human-readable diagnostic.
        message: String,
    },

    /// A stage exceeded its deadline.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
        /// The configured deadline in milliseconds.
        timeout_ms: u64,
    },

    /// A queue or channel sink rejected a message.
    #[error("queue error: {0}")]
    Queue(String),

    // ── Configuration / I/O ──────────────────────────────────────────

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FncastError {
    /// Shorthand for a [`FncastError::Cancelled`] raised in `stage`.
    pub fn cancelled(stage: PipelineStage) -> Self {
        Self::Cancelled { stage }
    }

    /// Shorthand for a [`FncastError::Stage`] fault.
    pub fn stage(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
        }
    }

    /// Whether this error represents cancellation rather than a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FncastError>;
