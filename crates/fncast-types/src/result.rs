//! Values produced by the pipeline stages.
//!
//! [`ValidationResult`] is consumed only by the orchestrator.
//! [`InferenceResult`] is the terminal artifact of one pipeline run and is
//! also the response body every trigger adapter serializes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key/value metadata derived from an event.
pub type Metadata = HashMap<String, String>;

/// Well-known metadata keys.
pub mod keys {
    /// The event identifier. Always present.
    pub const EVENT_ID: &str = "eventId";
    /// The event timestamp in integer epoch milliseconds. Always present.
    pub const TIMESTAMP: &str = "timestamp";
    /// Correlation identifier copied from a JSON object payload.
    pub const CORRELATION_ID: &str = "correlationId";
    /// Originating system copied from a JSON object payload.
    pub const SOURCE: &str = "source";
}

/// Diagnostic used when a failure is built without any error messages.
const UNSPECIFIED_FAILURE: &str = "pipeline failed without a diagnostic";

// ── Validation ──────────────────────────────────────────────────────────

/// Outcome of the validation stage.
///
/// `errors` is empty iff `is_valid` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    /// The payload is acceptable.
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// The payload is malformed.
    pub fn failure<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(UNSPECIFIED_FAILURE.to_owned());
        }
        Self {
            is_valid: false,
            errors,
        }
    }

    /// Whether the payload passed validation.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Validation errors, in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Take ownership of the error list.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

// ── Inference ───────────────────────────────────────────────────────────

/// Terminal result of one pipeline run.
///
/// Fields are private so the invariant holds after construction:
/// `success` implies `errors` is empty; failure implies `errors` is
/// non-empty, `output` is empty and `metadata` is empty. Deserialization
/// goes through the same constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InferenceResultWire")]
pub struct InferenceResult {
    success: bool,
    output: String,
    metadata: Metadata,
    errors: Vec<String>,
}

impl InferenceResult {
    /// A successful run.
    pub fn succeeded(output: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            success: true,
            output: output.into(),
            metadata,
            errors: Vec::new(),
        }
    }

    /// A failed run. An empty error list is replaced by a generic
    /// diagnostic.
    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(UNSPECIFIED_FAILURE.to_owned());
        }
        Self {
            success: false,
            output: String::new(),
            metadata: Metadata::new(),
            errors,
        }
    }

    /// Whether the pipeline produced an output.
    pub fn success(&self) -> bool {
        self.success
    }

    /// The primary output. Empty on failure.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Metadata carried through from extraction. Empty on failure.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Error messages. Empty on success.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Unchecked serialized form of [`InferenceResult`].
#[derive(Deserialize)]
struct InferenceResultWire {
    success: bool,
    #[serde(default)]
    output: String,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    errors: Vec<String>,
}

impl From<InferenceResultWire> for InferenceResult {
    /// Any error message makes the result a failure.
    fn from(wire: InferenceResultWire) -> Self {
        if wire.success && wire.errors.is_empty() {
            Self::succeeded(wire.output, wire.metadata)
        } else {
            Self::failed(wire.errors)
        }
    }
}
