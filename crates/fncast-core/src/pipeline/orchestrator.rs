//! Pipeline orchestrator.
//!
//! Sequences the four stages for a single event:
//!
//! ```text
//! Validating -> ExtractingMetadata -> Inferring -> Routing -> Done
//!      \______________(invalid payload)_____________/
//! ```
//!
//! The orchestrator is the only component allowed to short-circuit. The
//! output router runs exactly once per call, on the success path and on
//! every failure path, with one exception: when the cancellation signal is
//! observed, the call returns [`FncastError::Cancelled`] and nothing is
//! routed.
//!
//! Unexpected stage faults never escape `process`. A validator or executor
//! fault becomes a failed [`InferenceResult`]; an extractor fault degrades
//! to the base metadata; a router fault is logged and swallowed because the
//! result delivered to the caller is already final.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use fncast_types::{Event, FncastError, InferenceResult, Metadata, PipelineStage, Result};

use super::extractor::base_metadata;
use super::traits::{EventValidator, InferenceExecutor, MetadataExtractor, OutputRouter};

/// Wires the four stages together and runs them for one event at a time.
///
/// Holds no per-event state, so one instance can serve any number of
/// concurrent `process` calls behind an `Arc`.
pub struct Orchestrator {
    validator: Arc<dyn EventValidator>,
    extractor: Arc<dyn MetadataExtractor>,
    executor: Arc<dyn InferenceExecutor>,
    router: Arc<dyn OutputRouter>,
    inference_timeout: Option<Duration>,
}

impl Orchestrator {
    /// Create an orchestrator from concrete stage implementations.
    pub fn new(
        validator: Arc<dyn EventValidator>,
        extractor: Arc<dyn MetadataExtractor>,
        executor: Arc<dyn InferenceExecutor>,
        router: Arc<dyn OutputRouter>,
    ) -> Self {
        Self {
            validator,
            extractor,
            executor,
            router,
            inference_timeout: None,
        }
    }

    /// Bound the inference stage. A timeout becomes a failed result.
    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    /// Run the full pipeline for `event`.
    ///
    /// Returns `Err` only for cancellation; every other outcome, including
    /// stage faults, is an `Ok(InferenceResult)` that has already been
    /// routed.
    pub async fn process(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        debug!(
            event_id = %event.id(),
            content_type = %event.content_type(),
            payload_len = event.raw_payload().len(),
            "processing event"
        );

        let result = self.run_stages(event, cancel).await?;

        ensure_active(cancel, PipelineStage::Routing)?;
        debug!(event_id = %event.id(), stage = %PipelineStage::Routing, "entering stage");
        if let Err(e) = self.router.route(event, &result, cancel).await {
            warn!(event_id = %event.id(), error = %e, "output routing failed; result unaffected");
        }

        debug!(
            event_id = %event.id(),
            stage = %PipelineStage::Done,
            success = result.success(),
            "pipeline complete"
        );
        Ok(result)
    }

    /// Run the pipeline without an external cancellation signal.
    ///
    /// A stage may still report a cancellation on its own. That error is
    /// turned into a failed result, which is routed like any other, so the
    /// router runs exactly once on this path too.
    pub async fn process_uncancellable(&self, event: &Event) -> InferenceResult {
        let cancel = CancellationToken::new();
        match self.process(event, &cancel).await {
            Ok(result) => result,
            Err(e) => {
                warn!(event_id = %event.id(), error = %e, "stage reported cancellation without a signal");
                let result = InferenceResult::failed([e.to_string()]);
                if let Err(e) = self.router.route(event, &result, &cancel).await {
                    warn!(event_id = %event.id(), error = %e, "output routing failed; result unaffected");
                }
                result
            }
        }
    }

    /// Validating -> ExtractingMetadata -> Inferring. Produces the result
    /// that will be routed.
    async fn run_stages(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        // ── Validating ──────────────────────────────────────────────
        ensure_active(cancel, PipelineStage::Validating)?;
        debug!(event_id = %event.id(), stage = %PipelineStage::Validating, "entering stage");
        let validation = match self.validator.validate(event, cancel).await {
            Ok(v) => v,
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!(event_id = %event.id(), error = %e, "validator fault");
                return Ok(InferenceResult::failed([fault_message(
                    PipelineStage::Validating,
                    &e,
                )]));
            }
        };
        if !validation.is_valid() {
            return Ok(InferenceResult::failed(validation.into_errors()));
        }

        // ── ExtractingMetadata ──────────────────────────────────────
        ensure_active(cancel, PipelineStage::ExtractingMetadata)?;
        debug!(event_id = %event.id(), stage = %PipelineStage::ExtractingMetadata, "entering stage");
        let metadata = match self.extractor.extract(event, cancel).await {
            Ok(m) => m,
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!(event_id = %event.id(), error = %e, "metadata extraction failed; using base metadata");
                base_metadata(event)
            }
        };

        // ── Inferring ───────────────────────────────────────────────
        ensure_active(cancel, PipelineStage::Inferring)?;
        debug!(event_id = %event.id(), stage = %PipelineStage::Inferring, "entering stage");
        match self.execute(event, &metadata, cancel).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                warn!(event_id = %event.id(), error = %e, "inference fault");
                Ok(InferenceResult::failed([fault_message(
                    PipelineStage::Inferring,
                    &e,
                )]))
            }
        }
    }

    /// Call the executor, honoring the optional inference deadline.
    async fn execute(
        &self,
        event: &Event,
        metadata: &Metadata,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        let Some(timeout) = self.inference_timeout else {
            return self.executor.execute(event, metadata, cancel).await;
        };

        match tokio::time::timeout(timeout, self.executor.execute(event, metadata, cancel)).await {
            Ok(result) => result,
            Err(_) => Err(FncastError::Timeout {
                operation: "inference".into(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

/// Fail fast with [`FncastError::Cancelled`] if the token has fired.
fn ensure_active(cancel: &CancellationToken, stage: PipelineStage) -> Result<()> {
    if cancel.is_cancelled() {
        Err(FncastError::cancelled(stage))
    } else {
        Ok(())
    }
}

/// Diagnostic for a fault raised by `stage`. Stage errors already name
/// their stage, so they are used verbatim.
fn fault_message(stage: PipelineStage, error: &FncastError) -> String {
    match error {
        FncastError::Stage { .. } => error.to_string(),
        other => format!("{stage} stage failed: {other}"),
    }
}
