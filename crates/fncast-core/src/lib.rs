//! # fncast-core
//!
//! Core engine for the fncast event inference pipeline.
//!
//! Contains the four stage contracts (validate, extract metadata, execute
//! inference, route output), their reference implementations, the
//! [`Orchestrator`](pipeline::orchestrator::Orchestrator) that sequences
//! them for one event, and the configuration loader and bootstrap used by
//! the trigger adapters.

pub mod bootstrap;
pub mod config_loader;
pub mod pipeline;

pub use tokio_util::sync::CancellationToken;
