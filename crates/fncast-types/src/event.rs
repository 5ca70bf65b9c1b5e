//! The inbound event type.
//!
//! An [`Event`] is one unit of ingested work. Trigger adapters build it
//! with [`Event::new`] and hand it to the orchestrator by reference; no
//! stage can mutate it because there are no `&mut` accessors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Content type assumed when the producer does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// One unit of work: a raw payload plus facts about where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: String,
    timestamp: DateTime<Utc>,
    raw_payload: String,
    content_type: String,
    attributes: HashMap<String, String>,
}

impl Event {
    /// Build an event, filling in whatever the producer left out.
    ///
    /// - `id = None` generates a fresh UUID in 32-char simple hex form.
    /// - `timestamp = None` stamps the event with the ingestion time.
    /// - A blank `content_type` falls back to [`DEFAULT_CONTENT_TYPE`].
    pub fn new(
        id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
        raw_payload: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        let content_type = content_type.into();
        let content_type = if content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_owned()
        } else {
            content_type
        };

        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            raw_payload: raw_payload.into(),
            content_type,
            attributes: HashMap::new(),
        }
    }

    /// Attach a set of attributes. Consumes the event, so this can only
    /// happen before the event is shared.
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Attach a single attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Unique event identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the event was produced (or ingested, if the producer did not say).
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp as integer milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// The payload exactly as received. May be empty.
    pub fn raw_payload(&self) -> &str {
        &self.raw_payload
    }

    /// The payload's media type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Whether the content type names a JSON media type
    /// (case-insensitive substring match on `"json"`).
    pub fn is_json(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("json")
    }

    /// Producer-supplied attributes.
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generates_id_and_timestamp_when_absent() {
        let before = Utc::now();
        let event = Event::new(None, None, "hello", "text/plain");
        let after = Utc::now();

        assert_eq!(event.id().len(), 32);
        assert!(event.id().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(event.timestamp() >= before && event.timestamp() <= after);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = Event::new(None, None, "x", "text/plain");
        let b = Event::new(None, None, "x", "text/plain");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn keeps_supplied_id_and_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = Event::new(Some("evt-1".into()), Some(ts), "{}", "application/json");
        assert_eq!(event.id(), "evt-1");
        assert_eq!(event.timestamp(), ts);
        assert_eq!(event.timestamp_millis(), ts.timestamp_millis());
    }

    #[test]
    fn blank_content_type_defaults_to_json() {
        let event = Event::new(None, None, "{}", "  ");
        assert_eq!(event.content_type(), DEFAULT_CONTENT_TYPE);
        assert!(event.is_json());
    }

    #[test]
    fn json_detection_is_case_insensitive_substring() {
        assert!(Event::new(None, None, "", "APPLICATION/JSON").is_json());
        assert!(Event::new(None, None, "", "application/cloudevents+json").is_json());
        assert!(Event::new(None, None, "", "text/Json; charset=utf-8").is_json());
        assert!(!Event::new(None, None, "", "text/plain").is_json());
    }

    #[test]
    fn empty_payload_is_allowed() {
        let event = Event::new(None, None, "", "text/plain");
        assert_eq!(event.raw_payload(), "");
        assert!(event.attributes().is_empty());
    }

    #[test]
    fn attributes_attach_at_construction() {
        let mut attrs = HashMap::new();
        attrs.insert("trigger".to_string(), "http".to_string());
        let event = Event::new(None, None, "x", "text/plain")
            .with_attributes(attrs)
            .with_attribute("queue", "fncast-events");
        assert_eq!(event.attribute("trigger"), Some("http"));
        assert_eq!(event.attribute("queue"), Some("fncast-events"));
        assert_eq!(event.attribute("missing"), None);
    }

    #[test]
    fn serializes_camel_case() {
        let event = Event::new(Some("e".into()), None, "p", "text/plain");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["rawPayload"], "p");
        assert_eq!(json["contentType"], "text/plain");
    }
}
