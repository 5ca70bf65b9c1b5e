//! HTTP trigger for the fncast pipeline.
//!
//! Exposes a health check and two ingestion endpoints. Every request is
//! processed with a child of the server's shutdown token, so stopping the
//! server aborts in-flight pipelines with a `503`.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use fncast_core::bootstrap::AppContext;
use fncast_core::pipeline::orchestrator::Orchestrator;

use crate::error::Result;

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// The wired pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Server-wide shutdown signal; requests run on child tokens.
    pub shutdown: CancellationToken,
}

impl ApiState {
    /// Create API state from an orchestrator and a shutdown token.
    pub fn new(orchestrator: Arc<Orchestrator>, shutdown: CancellationToken) -> Self {
        Self {
            orchestrator,
            shutdown,
        }
    }

    /// Create API state sharing the orchestrator of an [`AppContext`].
    pub fn from_context(ctx: &AppContext, shutdown: CancellationToken) -> Self {
        Self::new(ctx.orchestrator().clone(), shutdown)
    }
}

/// Build the API router with all routes.
pub fn build_router(state: ApiState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(handlers::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until `shutdown` is cancelled.
pub async fn serve(ctx: AppContext, shutdown: CancellationToken) -> Result<()> {
    let addr = ctx.config().server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    serve_listener(listener, ctx, shutdown).await
}

/// Serve on an already-bound listener until `shutdown` is cancelled.
pub async fn serve_listener(
    listener: TcpListener,
    ctx: AppContext,
    shutdown: CancellationToken,
) -> Result<()> {
    let local_addr = listener.local_addr()?;
    let state = ApiState::from_context(&ctx, shutdown.clone());
    let router = build_router(state, &ctx.config().server.cors_origins);

    info!(addr = %local_addr, "http trigger listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            info!("http trigger shutting down");
        })
        .await?;
    Ok(())
}
