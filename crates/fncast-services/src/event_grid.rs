//! Event-bus trigger for Event Grid style notifications.
//!
//! A notification envelope carries routing fields (`eventType`, `subject`)
//! and an arbitrary JSON `data` member. The consumer runs the `data` text,
//! exactly as it appeared in the delivery body, through the pipeline as
//! `application/json`; the envelope fields travel along as event
//! attributes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use fncast_core::pipeline::orchestrator::Orchestrator;
use fncast_types::{Event, InferenceResult};

use crate::TRIGGER_ATTRIBUTE;
use crate::error::{Result, ServiceError};

/// Value of the `trigger` attribute on events produced by this adapter.
pub const EVENT_GRID_TRIGGER: &str = "event_grid";

/// Content type assigned to every notification payload.
pub const EVENT_GRID_CONTENT_TYPE: &str = "application/json";

/// A single notification as delivered by the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridEvent {
    /// Notification identifier assigned by the publisher.
    pub id: String,
    pub event_type: String,
    pub subject: String,
    /// Event payload, kept as the original JSON text. Missing or `null`
    /// data is treated as JSON `null`.
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
    #[serde(default)]
    pub data_version: String,
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
}

impl EventGridEvent {
    /// The `data` member as it appeared in the delivery body.
    pub fn data_text(&self) -> &str {
        self.data.as_deref().map_or("null", RawValue::get)
    }
}

/// Runs bus notifications through the pipeline.
pub struct EventGridConsumer {
    orchestrator: Arc<Orchestrator>,
}

impl EventGridConsumer {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Build the pipeline event for one notification.
    ///
    /// The event gets a fresh id; the notification id is kept in the
    /// `notificationId` attribute.
    pub fn to_event(notification: &EventGridEvent) -> Event {
        Event::new(None, None, notification.data_text(), EVENT_GRID_CONTENT_TYPE)
            .with_attribute(TRIGGER_ATTRIBUTE, EVENT_GRID_TRIGGER)
            .with_attribute("eventType", notification.event_type.as_str())
            .with_attribute("subject", notification.subject.as_str())
            .with_attribute("notificationId", notification.id.as_str())
    }

    /// Process one notification.
    pub async fn handle(
        &self,
        notification: &EventGridEvent,
        cancel: &CancellationToken,
    ) -> Result<InferenceResult> {
        let event = Self::to_event(notification);
        debug!(
            event_id = %event.id(),
            notification_id = %notification.id,
            event_type = %notification.event_type,
            "event grid notification received"
        );
        Ok(self.orchestrator.process(&event, cancel).await?)
    }

    /// Decode and process a delivery body.
    ///
    /// The bus delivers a JSON array of notifications; a single object is
    /// accepted too. Notifications are processed in order, and a
    /// cancellation stops the batch.
    pub async fn handle_batch(
        &self,
        body: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<InferenceResult>> {
        let notifications = parse_delivery(body)?;
        let mut results = Vec::with_capacity(notifications.len());
        for notification in &notifications {
            results.push(self.handle(notification, cancel).await?);
        }
        Ok(results)
    }
}

/// Decode a delivery body into its notifications.
///
/// Parses straight from the body text so every `data` member keeps its
/// original bytes. Malformed JSON is a [`ServiceError::Json`]; well-formed
/// JSON of the wrong shape is a [`ServiceError::InvalidNotification`].
pub fn parse_delivery(body: &str) -> Result<Vec<EventGridEvent>> {
    let notifications = if body.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<EventGridEvent>>(body)
    } else {
        serde_json::from_str::<EventGridEvent>(body).map(|one| vec![one])
    };
    notifications.map_err(|e| {
        if e.is_data() {
            ServiceError::InvalidNotification(e.to_string())
        } else {
            ServiceError::Json(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fncast_core::bootstrap::build_orchestrator;
    use fncast_core::pipeline::output_router::LoggingOutputRouter;
    use fncast_types::config::{Config, InferenceMode};
    use fncast_types::result::keys;

    fn consumer(mode: InferenceMode) -> EventGridConsumer {
        let mut config = Config::default();
        config.inference.mode = mode;
        config.inference.simulated_latency_ms = 0;
        let orch = build_orchestrator(&config, Arc::new(LoggingOutputRouter::new()));
        EventGridConsumer::new(Arc::new(orch))
    }

    const DELIVERY: &str = r#"[
        {
            "id": "n-1",
            "eventType": "Contoso.Items.ItemReceived",
            "subject": "items/1",
            "data": { "correlationId": "abc", "source": "svc", "qty": 3 },
            "dataVersion": "1.0",
            "eventTime": "2024-01-01T00:00:00Z"
        },
        {
            "id": "n-2",
            "eventType": "Contoso.Items.ItemShipped",
            "subject": "items/2",
            "data": "shipped"
        }
    ]"#;

    #[test]
    fn parses_array_and_single_object() {
        let batch = parse_delivery(DELIVERY).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].event_type, "Contoso.Items.ItemReceived");
        assert!(batch[0].event_time.is_some());
        assert_eq!(batch[1].data_version, "");

        let single = parse_delivery(r#"{"id":"x","eventType":"t","subject":"s"}"#).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].data.is_none());
        assert_eq!(single[0].data_text(), "null");
    }

    #[test]
    fn rejects_malformed_delivery() {
        assert!(matches!(parse_delivery("not json"), Err(ServiceError::Json(_))));
        assert!(matches!(
            parse_delivery(r#"[{"id": 1}]"#),
            Err(ServiceError::InvalidNotification(_))
        ));
    }

    #[test]
    fn event_carries_envelope_attributes() {
        let batch = parse_delivery(DELIVERY).unwrap();
        let event = EventGridConsumer::to_event(&batch[0]);
        assert_eq!(event.content_type(), "application/json");
        assert_eq!(event.attribute("trigger"), Some("event_grid"));
        assert_eq!(event.attribute("eventType"), Some("Contoso.Items.ItemReceived"));
        assert_eq!(event.attribute("subject"), Some("items/1"));
        assert_eq!(event.attribute("notificationId"), Some("n-1"));
        assert_ne!(event.id(), "n-1");
    }

    #[tokio::test]
    async fn batch_runs_each_notification() {
        let results = consumer(InferenceMode::Echo)
            .handle_batch(DELIVERY, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        assert!(results[0].success());
        assert_eq!(results[0].metadata()[keys::CORRELATION_ID], "abc");
        assert_eq!(results[0].metadata()[keys::SOURCE], "svc");

        // A JSON string payload is valid JSON and is echoed in its quoted form.
        assert!(results[1].success());
        assert_eq!(results[1].output(), "\"shipped\"");
    }

    #[tokio::test]
    async fn echo_returns_data_text_byte_for_byte() {
        let data = r#"{"source": "svc", "correlationId": "abc", "n": 1.0e2}"#;
        let body = format!(r#"{{"id":"n","eventType":"t","subject":"s","data": {data} }}"#);

        let results = consumer(InferenceMode::Echo)
            .handle_batch(&body, &CancellationToken::new())
            .await
            .unwrap();

        assert!(results[0].success());
        assert_eq!(results[0].output(), data);
        assert_eq!(results[0].metadata()[keys::CORRELATION_ID], "abc");
    }

    #[test]
    fn event_payload_is_untouched_data_text() {
        let body = r#"[{"id":"n","eventType":"t","subject":"s","data":{"b": 2,  "a":[1, 2.50]}}]"#;
        let batch = parse_delivery(body).unwrap();
        let event = EventGridConsumer::to_event(&batch[0]);
        assert_eq!(event.raw_payload(), r#"{"b": 2,  "a":[1, 2.50]}"#);
    }

    #[tokio::test]
    async fn cancelled_batch_is_an_error() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = consumer(InferenceMode::Echo)
            .handle_batch(DELIVERY, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
