//! Placeholder inference executor (reference implementation).
//!
//! Stands in for a real model: applies the configured [`InferenceMode`]
//! (uppercase, lowercase, or echo) to the raw payload and passes the
//! metadata through unchanged. A configurable delay simulates backend
//! latency so that cancellation and timeouts behave as they would against
//! a remote model.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use fncast_types::config::{InferenceConfig, InferenceMode};
use fncast_types::{Event, FncastError, InferenceResult, Metadata, PipelineStage, Result};

use super::traits::InferenceExecutor;

/// Case-conversion stand-in for a real inference backend.
pub struct PlaceholderInferenceExecutor {
    mode: InferenceMode,
    simulated_latency: Duration,
}

impl PlaceholderInferenceExecutor {
    /// Create an executor with no simulated latency.
    pub fn new(mode: InferenceMode) -> Self {
        Self {
            mode,
            simulated_latency: Duration::ZERO,
        }
    }

    /// Create an executor from the inference section of the configuration.
    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(config.mode).with_simulated_latency(Duration::from_millis(
            config.simulated_latency_ms,
        ))
    }

    /// Set the artificial delay applied before each answer.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    /// The configured transform.
    pub fn mode(&self) -> InferenceMode {
        self.mode
    }
}

impl Default for PlaceholderInferenceExecutor {
    fn default() -> Self {
        Self::new(InferenceMode::default())
    }
}

#[async_trait]
impl InferenceExecutor for PlaceholderInferenceExecutor {
    async fn execute(
        &self,
        event: &Event,
        metadata: &Metadata,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        if cancel.is_cancelled() {
            return Err(FncastError::cancelled(PipelineStage::Inferring));
        }

        if !self.simulated_latency.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(FncastError::cancelled(PipelineStage::Inferring));
                }
                _ = tokio::time::sleep(self.simulated_latency) => {}
            }
        }

        let output = self.mode.apply(event.raw_payload());
        debug!(event_id = %event.id(), mode = %self.mode, "placeholder inference complete");
        Ok(InferenceResult::succeeded(output, metadata.clone()))
    }
}
