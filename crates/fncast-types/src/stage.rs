//! Pipeline stage labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The orchestrator's states for a single event.
///
/// Transitions are strictly forward:
/// `Validating -> ExtractingMetadata -> Inferring -> Routing -> Done`.
/// A failed validation jumps straight from `Validating` to `Routing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Checking that the payload is well-formed.
    Validating,
    /// Deriving the metadata mapping.
    ExtractingMetadata,
    /// Producing the primary output.
    Inferring,
    /// Delivering the result to the sink.
    Routing,
    /// The result has been routed and returned.
    Done,
}

impl PipelineStage {
    /// Stable lowercase label used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::ExtractingMetadata => "extracting_metadata",
            Self::Inferring => "inferring",
            Self::Routing => "routing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
