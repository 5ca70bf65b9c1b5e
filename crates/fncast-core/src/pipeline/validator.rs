//! JSON syntax validator (reference implementation).
//!
//! If the content type names a JSON media type, the payload must parse as
//! syntactically valid JSON. Any other content type is accepted
//! unconditionally. A parse failure yields an invalid result with exactly
//! one message embedding the parser's diagnostic.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use fncast_types::{Event, FncastError, PipelineStage, Result, ValidationResult};

use super::traits::EventValidator;

/// Validates JSON payloads with `serde_json`; passes everything else.
pub struct JsonEventValidator;

impl JsonEventValidator {
    /// Create a new JSON validator.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonEventValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventValidator for JsonEventValidator {
    async fn validate(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        if cancel.is_cancelled() {
            return Err(FncastError::cancelled(PipelineStage::Validating));
        }

        if !event.is_json() {
            return Ok(ValidationResult::success());
        }

        match serde_json::from_str::<serde::de::IgnoredAny>(event.raw_payload()) {
            Ok(_) => Ok(ValidationResult::success()),
            Err(e) => {
                debug!(event_id = %event.id(), error = %e, "payload is not valid JSON");
                Ok(ValidationResult::failure([format!("Invalid JSON: {e}")]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn validate(payload: &str, content_type: &str) -> ValidationResult {
        let event = Event::new(None, None, payload, content_type);
        JsonEventValidator::new()
            .validate(&event, &CancellationToken::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_json_object() {
        let v = validate(r#"{"a": 1, "b": [true, null]}"#, "application/json").await;
        assert!(v.is_valid());
        assert!(v.errors().is_empty());
    }

    #[tokio::test]
    async fn accepts_json_array_and_scalar_roots() {
        assert!(validate("[1, 2, 3]", "application/json").await.is_valid());
        assert!(validate("\"text\"", "application/json").await.is_valid());
        assert!(validate("42", "application/json").await.is_valid());
    }

    #[tokio::test]
    async fn rejects_malformed_json_with_single_error() {
        let v = validate("{ invalid json ", "application/json").await;
        assert!(!v.is_valid());
        assert_eq!(v.errors().len(), 1);
        assert!(v.errors()[0].starts_with("Invalid JSON: "));
        // The parser's diagnostic carries a position.
        assert!(v.errors()[0].contains("line 1"));
    }

    #[tokio::test]
    async fn rejects_empty_json_payload() {
        let v = validate("", "application/json").await;
        assert!(!v.is_valid());
    }

    #[tokio::test]
    async fn rejects_trailing_garbage() {
        let v = validate(r#"{"a": 1} extra"#, "application/json").await;
        assert!(!v.is_valid());
    }

    #[tokio::test]
    async fn content_type_match_is_case_insensitive() {
        let v = validate("not json", "Application/JSON; charset=utf-8").await;
        assert!(!v.is_valid());
    }

    #[tokio::test]
    async fn non_json_content_types_always_pass() {
        for payload in ["", "hello", "{ invalid json ", "\u{0}\u{1}", "<xml/>"] {
            for ct in ["text/plain", "application/xml", "application/octet-stream"] {
                let v = validate(payload, ct).await;
                assert!(v.is_valid(), "{ct} payload {payload:?} should pass");
            }
        }
    }

    #[tokio::test]
    async fn observes_cancellation() {
        let event = Event::new(None, None, "{}", "application/json");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = JsonEventValidator::new()
            .validate(&event, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn does_not_mutate_event() {
        let event = Event::new(Some("e1".into()), None, "{ bad", "application/json");
        let before = event.clone();
        let _ = JsonEventValidator::new()
            .validate(&event, &CancellationToken::new())
            .await;
        assert_eq!(event, before);
    }
}
