//! Basic metadata extractor (reference implementation).
//!
//! Always emits `eventId` and `timestamp` (epoch milliseconds). For JSON
//! payloads whose root is an object, `correlationId` and `source` are
//! copied when present. Anything unexpected (non-object root, unparsable
//! text, missing or structured fields) silently degrades to the base
//! mapping; this stage never fails the pipeline.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use fncast_types::result::keys;
use fncast_types::{Event, FncastError, Metadata, PipelineStage, Result};

use super::traits::MetadataExtractor;

/// Payload fields copied into metadata when the root is a JSON object.
const COPIED_FIELDS: &[&str] = &[keys::CORRELATION_ID, keys::SOURCE];

/// Extracts identity, timestamp and a few well-known payload fields.
pub struct BasicMetadataExtractor;

impl BasicMetadataExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for BasicMetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// The two keys every metadata mapping carries.
pub fn base_metadata(event: &Event) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert(keys::EVENT_ID.into(), event.id().to_owned());
    meta.insert(keys::TIMESTAMP.into(), event.timestamp_millis().to_string());
    meta
}

/// Render a JSON field as a metadata string. Strings are taken verbatim,
/// numbers and booleans use their JSON text, everything else is skipped.
fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[async_trait]
impl MetadataExtractor for BasicMetadataExtractor {
    async fn extract(&self, event: &Event, cancel: &CancellationToken) -> Result<Metadata> {
        if cancel.is_cancelled() {
            return Err(FncastError::cancelled(PipelineStage::ExtractingMetadata));
        }

        let mut meta = base_metadata(event);
        if !event.is_json() {
            return Ok(meta);
        }

        let root = match serde_json::from_str::<Value>(event.raw_payload()) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                trace!(event_id = %event.id(), "JSON root is not an object, skipping payload fields");
                return Ok(meta);
            }
            Err(e) => {
                trace!(event_id = %event.id(), error = %e, "payload unparsable, skipping payload fields");
                return Ok(meta);
            }
        };

        for field in COPIED_FIELDS {
            if let Some(value) = root.get(*field).and_then(field_as_string) {
                meta.insert((*field).to_owned(), value);
            }
        }

        Ok(meta)
    }
}
