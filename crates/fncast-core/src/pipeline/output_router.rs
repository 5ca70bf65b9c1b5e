//! Output routers (reference implementations).
//!
//! [`LoggingOutputRouter`] writes one structured log line per event.
//! [`ChannelOutputRouter`] forwards results onto a bounded tokio channel
//! so a downstream consumer (a queue writer, a stdout emitter) can pick
//! them up. By default a full channel is an error; a router built with
//! [`ChannelOutputRouter::awaiting_capacity`] waits for room instead.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use fncast_types::{Event, FncastError, InferenceResult, PipelineStage, Result};

use super::traits::OutputRouter;

/// Separator used when joining error messages into one log line.
const ERROR_SEPARATOR: &str = "; ";

// ── Logging ─────────────────────────────────────────────────────────────

/// Logs an `info` line on success and a `warn` line on failure.
pub struct LoggingOutputRouter;

impl LoggingOutputRouter {
    /// Create a new logging router.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingOutputRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputRouter for LoggingOutputRouter {
    async fn route(
        &self,
        event: &Event,
        result: &InferenceResult,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        if result.success() {
            info!(
                event_id = %event.id(),
                output = %result.output(),
                "inference succeeded"
            );
        } else {
            warn!(
                event_id = %event.id(),
                errors = %result.errors().join(ERROR_SEPARATOR),
                "inference failed"
            );
        }
        Ok(())
    }
}

// ── Downstream channel ──────────────────────────────────────────────────

/// A routed result, as delivered to a downstream consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedOutput {
    /// Identifier of the event the result belongs to.
    pub event_id: String,
    /// The final pipeline result.
    pub result: InferenceResult,
}

/// Forwards every result onto a bounded MPSC channel.
///
/// By default uses `try_send`, so a full or closed channel is reported as
/// [`FncastError::Queue`] instead of blocking the pipeline. The orchestrator
/// swallows router errors, so that mode drops results under backpressure.
/// Sinks that must see every result use [`awaiting_capacity`](Self::awaiting_capacity).
pub struct ChannelOutputRouter {
    tx: mpsc::Sender<RoutedOutput>,
    await_capacity: bool,
}

impl ChannelOutputRouter {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::Sender<RoutedOutput>) -> Self {
        Self {
            tx,
            await_capacity: false,
        }
    }

    /// Create a router together with the receiving half of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RoutedOutput>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Wait for channel capacity instead of failing when the channel is
    /// full. The wait ends early, with [`FncastError::Cancelled`], when the
    /// call's cancellation token fires.
    pub fn awaiting_capacity(mut self) -> Self {
        self.await_capacity = true;
        self
    }

    async fn send_waiting(&self, routed: RoutedOutput, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FncastError::cancelled(PipelineStage::Routing)),
            sent = self.tx.send(routed) => {
                sent.map_err(|_| FncastError::Queue("output channel closed".into()))
            }
        }
    }
}

#[async_trait]
impl OutputRouter for ChannelOutputRouter {
    async fn route(
        &self,
        event: &Event,
        result: &InferenceResult,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let routed = RoutedOutput {
            event_id: event.id().to_owned(),
            result: result.clone(),
        };
        if self.await_capacity {
            return self.send_waiting(routed, cancel).await;
        }
        self.tx.try_send(routed).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                FncastError::Queue("output channel full (backpressure)".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                FncastError::Queue("output channel closed".into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fncast_types::Metadata;

    fn event() -> Event {
        Event::new(Some("evt-1".into()), None, "hello", "text/plain")
    }

    #[tokio::test]
    async fn logging_router_accepts_success_and_failure() {
        let router = LoggingOutputRouter::new();
        let cancel = CancellationToken::new();
        router
            .route(&event(), &InferenceResult::succeeded("HELLO", Metadata::new()), &cancel)
            .await
            .unwrap();
        router
            .route(&event(), &InferenceResult::failed(["a", "b"]), &cancel)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn channel_router_forwards_result() {
        let (router, mut rx) = ChannelOutputRouter::channel(4);
        let result = InferenceResult::succeeded("HELLO", Metadata::new());
        router
            .route(&event(), &result, &CancellationToken::new())
            .await
            .unwrap();

        let routed = rx.recv().await.unwrap();
        assert_eq!(routed.event_id, "evt-1");
        assert_eq!(routed.result, result);
    }

    #[tokio::test]
    async fn channel_router_reports_backpressure() {
        let (router, _rx) = ChannelOutputRouter::channel(1);
        let result = InferenceResult::failed(["x"]);
        let cancel = CancellationToken::new();
        router.route(&event(), &result, &cancel).await.unwrap();
        let err = router.route(&event(), &result, &cancel).await.unwrap_err();
        assert!(err.to_string().contains("full"));
    }

    #[tokio::test]
    async fn channel_router_reports_closed_channel() {
        let (router, rx) = ChannelOutputRouter::channel(1);
        drop(rx);
        let err = router
            .route(&event(), &InferenceResult::failed(["x"]), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FncastError::Queue(_)));
        assert!(err.to_string().contains("closed"));
    }

    #[tokio::test]
    async fn awaiting_router_waits_for_capacity() {
        let (router, mut rx) = ChannelOutputRouter::channel(1);
        let router = Arc::new(router.awaiting_capacity());
        let cancel = CancellationToken::new();
        let first = InferenceResult::succeeded("one", Metadata::new());
        let second = InferenceResult::succeeded("two", Metadata::new());

        router.route(&event(), &first, &cancel).await.unwrap();

        let pending = {
            let router = router.clone();
            let second = second.clone();
            tokio::spawn(async move {
                router
                    .route(&event(), &second, &CancellationToken::new())
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!pending.is_finished());

        assert_eq!(rx.recv().await.unwrap().result, first);
        pending.await.unwrap().unwrap();
        assert_eq!(rx.recv().await.unwrap().result, second);
    }

    #[tokio::test]
    async fn awaiting_router_stops_waiting_on_cancel() {
        let (router, _rx) = ChannelOutputRouter::channel(1);
        let router = router.awaiting_capacity();
        let result = InferenceResult::failed(["x"]);
        let cancel = CancellationToken::new();
        router.route(&event(), &result, &cancel).await.unwrap();

        cancel.cancel();
        let err = router.route(&event(), &result, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            FncastError::Cancelled {
                stage: PipelineStage::Routing
            }
        ));
    }

    #[tokio::test]
    async fn awaiting_router_reports_closed_channel() {
        let (router, rx) = ChannelOutputRouter::channel(1);
        let router = router.awaiting_capacity();
        drop(rx);
        let err = router
            .route(&event(), &InferenceResult::failed(["x"]), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn routed_output_serializes_camel_case() {
        let routed = RoutedOutput {
            event_id: "e".into(),
            result: InferenceResult::succeeded("o", Metadata::new()),
        };
        let json = serde_json::to_value(&routed).unwrap();
        assert_eq!(json["eventId"], "e");
        assert_eq!(json["result"]["output"], "o");
    }
}
