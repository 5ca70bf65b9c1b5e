//! # fncast-types
//!
//! Core type definitions for the fncast event inference pipeline.
//!
//! This crate is the foundation of the dependency graph -- all other
//! fncast crates depend on it. It contains:
//!
//! - **[`error`]** -- [`FncastError`] and the crate-wide [`Result`] alias
//! - **[`event`]** -- the immutable [`Event`] flowing through the pipeline
//! - **[`result`]** -- [`ValidationResult`], [`InferenceResult`], [`Metadata`]
//! - **[`stage`]** -- [`PipelineStage`], the orchestrator's state labels
//! - **[`config`]** -- Configuration schema

pub mod config;
pub mod error;
pub mod event;
pub mod result;
pub mod stage;

pub use error::{FncastError, Result};
pub use event::Event;
pub use result::{InferenceResult, Metadata, ValidationResult};
pub use stage::PipelineStage;
