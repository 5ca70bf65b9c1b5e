//! `fncast serve` -- run the HTTP trigger until Ctrl+C.
//!
//! # Example
//!
//! ```text
//! fncast serve
//! fncast serve --host 0.0.0.0 --port 8080
//! ```

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use fncast_core::bootstrap::AppContext;
use fncast_types::config::Config;

/// Arguments for the `fncast serve` subcommand.
#[derive(Args)]
pub struct ServeArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bind host (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config).
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Run the `serve` command.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref()).await?;
    apply_overrides(&mut config, &args);

    let ctx = AppContext::new(config);
    let cancel = CancellationToken::new();
    super::cancel_on_ctrl_c(cancel.clone());

    fncast_services::api::serve(ctx, cancel).await?;
    info!("server stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}
