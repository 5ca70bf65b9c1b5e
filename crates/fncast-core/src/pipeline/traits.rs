//! 4-stage pipeline trait definitions.
//!
//! Each stage is an independent capability. The orchestrator depends only
//! on these traits, so any stage can be swapped (a real model in place of
//! the placeholder executor, a store in place of the logging router)
//! without touching orchestration logic.
//!
//! The pipeline stages in order:
//! 1. **[`EventValidator`]** -- Decide whether the payload is well-formed
//! 2. **[`MetadataExtractor`]** -- Derive the key/value metadata mapping
//! 3. **[`InferenceExecutor`]** -- Produce the primary output
//! 4. **[`OutputRouter`]** -- Deliver the result to a sink
//!
//! Every call receives a [`CancellationToken`]. A stage that observes
//! cancellation returns [`FncastError::Cancelled`](fncast_types::FncastError::Cancelled);
//! any other `Err` is an unexpected fault that the orchestrator converts
//! into a failed result.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use fncast_types::{Event, InferenceResult, Metadata, Result, ValidationResult};

/// Stage 1: Check that the raw payload is well-formed enough to proceed.
#[async_trait]
pub trait EventValidator: Send + Sync {
    /// Validate the event. Malformed payloads are reported through the
    /// returned [`ValidationResult`], never through `Err`.
    async fn validate(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult>;
}

/// Stage 2: Derive metadata from the event.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Extract metadata. The mapping always contains `eventId` and
    /// `timestamp`.
    async fn extract(&self, event: &Event, cancel: &CancellationToken) -> Result<Metadata>;
}

/// Stage 3: Produce the primary output from the payload and metadata.
#[async_trait]
pub trait InferenceExecutor: Send + Sync {
    /// Run inference for a validated event.
    async fn execute(
        &self,
        event: &Event,
        metadata: &Metadata,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult>;
}

/// Stage 4: Deliver the final result to a sink (log, store, downstream queue).
#[async_trait]
pub trait OutputRouter: Send + Sync {
    /// Route the result. Invoked exactly once per processed event.
    async fn route(
        &self,
        event: &Event,
        result: &InferenceResult,
        cancel: &CancellationToken,
    ) -> Result<()>;
}
