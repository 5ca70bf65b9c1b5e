//! 4-stage pluggable pipeline system.
//!
//! Stages: Validator -> MetadataExtractor -> InferenceExecutor -> OutputRouter

pub mod traits;
pub mod validator;
pub mod extractor;
pub mod executor;
pub mod output_router;
pub mod orchestrator;
