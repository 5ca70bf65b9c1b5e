//! Application bootstrap and dependency wiring.
//!
//! Provides [`AppContext`], which builds the reference pipeline from a
//! [`Config`] by explicit construction: each concrete stage is created
//! and handed to the [`Orchestrator`]. Trigger adapters share the context
//! (config and orchestrator are both behind `Arc`) and never see the
//! concrete stage types.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fncast_core::bootstrap::AppContext;
//! use fncast_types::config::Config;
//!
//! let ctx = AppContext::new(Config::default());
//! let result = ctx.orchestrator().process(&event, &cancel).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use fncast_types::config::Config;

use crate::pipeline::executor::PlaceholderInferenceExecutor;
use crate::pipeline::extractor::BasicMetadataExtractor;
use crate::pipeline::orchestrator::Orchestrator;
use crate::pipeline::output_router::LoggingOutputRouter;
use crate::pipeline::traits::OutputRouter;
use crate::pipeline::validator::JsonEventValidator;

/// Read-only process-wide state: configuration plus the wired pipeline.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<Config>,
    orchestrator: Arc<Orchestrator>,
}

impl AppContext {
    /// Build the reference pipeline, routing results to the log.
    pub fn new(config: Config) -> Self {
        Self::with_router(config, Arc::new(LoggingOutputRouter::new()))
    }

    /// Build the reference pipeline with a caller-supplied output router.
    pub fn with_router(config: Config, router: Arc<dyn OutputRouter>) -> Self {
        let orchestrator = build_orchestrator(&config, router);
        info!(
            mode = %config.inference.mode,
            simulated_latency_ms = config.inference.simulated_latency_ms,
            timeout_ms = ?config.inference.timeout_ms,
            "pipeline initialized"
        );
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Root configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The wired pipeline.
    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }
}

/// Wire the reference stages into an orchestrator.
pub fn build_orchestrator(config: &Config, router: Arc<dyn OutputRouter>) -> Orchestrator {
    Orchestrator::new(
        Arc::new(JsonEventValidator::new()),
        Arc::new(BasicMetadataExtractor::new()),
        Arc::new(PlaceholderInferenceExecutor::from_config(&config.inference)),
        router,
    )
    .with_inference_timeout(config.inference.timeout_ms.map(Duration::from_millis))
}
