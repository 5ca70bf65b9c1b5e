//! Trigger adapters for the fncast pipeline.
//!
//! Each adapter turns an external delivery (an HTTP request, a queue
//! message, an event-bus notification) into an [`Event`](fncast_types::Event),
//! hands it to the shared [`Orchestrator`](fncast_core::pipeline::orchestrator::Orchestrator),
//! and reports the resulting [`InferenceResult`](fncast_types::InferenceResult)
//! back through its own transport.

pub mod api;
pub mod error;
pub mod event_grid;
pub mod queue;

/// Attribute key naming the adapter that produced an event.
pub const TRIGGER_ATTRIBUTE: &str = "trigger";
