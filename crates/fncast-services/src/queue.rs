//! In-process queue trigger.
//!
//! [`IngestQueue`] is the producer side of a bounded tokio MPSC channel of
//! raw message bodies; [`QueueConsumer`] drains it, turning every message
//! into a `text/plain` event and running it through the pipeline one at a
//! time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use fncast_core::pipeline::orchestrator::Orchestrator;
use fncast_types::config::QueueConfig;
use fncast_types::{Event, InferenceResult};

use crate::TRIGGER_ATTRIBUTE;
use crate::error::{Result, ServiceError};

/// Value of the `trigger` attribute on events produced by this adapter.
pub const QUEUE_TRIGGER: &str = "queue";

/// Attribute key carrying the name of the source queue.
pub const QUEUE_ATTRIBUTE: &str = "queue";

/// Content type assigned to every queue message.
pub const QUEUE_CONTENT_TYPE: &str = "text/plain";

/// Producer handle for a named, bounded ingest queue.
#[derive(Clone)]
pub struct IngestQueue {
    name: Arc<str>,
    tx: mpsc::Sender<String>,
}

impl IngestQueue {
    /// Create a queue and its receiving half.
    pub fn bounded(name: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let name: String = name.into();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        debug!(queue = %name, capacity, "ingest queue created");
        (
            Self {
                name: name.into(),
                tx,
            },
            rx,
        )
    }

    /// Create a queue sized and named by configuration.
    pub fn from_config(config: &QueueConfig) -> (Self, mpsc::Receiver<String>) {
        Self::bounded(config.name.clone(), config.capacity)
    }

    /// Queue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a message without waiting.
    ///
    /// Returns an error if the buffer is full or the consumer is gone.
    pub fn publish(&self, message: impl Into<String>) -> Result<()> {
        self.tx.try_send(message.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ServiceError::QueueFull(self.name.to_string()),
            mpsc::error::TrySendError::Closed(_) => {
                ServiceError::QueueClosed(self.name.to_string())
            }
        })
    }

    /// Enqueue a message, waiting asynchronously if the buffer is full.
    pub async fn publish_async(&self, message: impl Into<String>) -> Result<()> {
        self.tx
            .send(message.into())
            .await
            .map_err(|_| ServiceError::QueueClosed(self.name.to_string()))
    }
}

/// Drains an ingest queue into the pipeline.
pub struct QueueConsumer {
    name: String,
    orchestrator: Arc<Orchestrator>,
    rx: mpsc::Receiver<String>,
}

impl QueueConsumer {
    pub fn new(
        name: impl Into<String>,
        orchestrator: Arc<Orchestrator>,
        rx: mpsc::Receiver<String>,
    ) -> Self {
        Self {
            name: name.into(),
            orchestrator,
            rx,
        }
    }

    /// Build the event for one queue message.
    pub fn to_event(&self, message: String) -> Event {
        Event::new(None, None, message, QUEUE_CONTENT_TYPE)
            .with_attribute(TRIGGER_ATTRIBUTE, QUEUE_TRIGGER)
            .with_attribute(QUEUE_ATTRIBUTE, self.name.as_str())
    }

    /// Process a single message.
    pub async fn handle_message(
        &self,
        message: String,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        let event = self.to_event(message);
        Ok(self.orchestrator.process(&event, cancel).await?)
    }

    /// Process messages sequentially until every producer is dropped and
    /// the buffer is empty, or until `cancel` fires.
    ///
    /// Returns the number of messages that went through the pipeline.
    pub async fn run(mut self, cancel: &CancellationToken) -> usize {
        info!(queue = %self.name, "queue consumer started");
        let mut processed = 0usize;
        loop {
            let message = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(m) => m,
                    None => break,
                },
            };

            if let Err(e) = self.handle_message(message, cancel).await {
                // Cancellation is the only error the pipeline surfaces.
                debug!(queue = %self.name, error = %e, "queue message aborted");
                break;
            }
            processed += 1;
        }
        info!(queue = %self.name, processed, "queue consumer stopped");
        processed
    }
}
