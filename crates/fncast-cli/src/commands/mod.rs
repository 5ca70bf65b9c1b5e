//! CLI command implementations for `fncast`.
//!
//! Each subcommand is implemented in its own module:
//!
//! - [`process`] -- One-shot processing of a single payload.
//! - [`serve`] -- HTTP trigger until Ctrl+C.
//! - [`consume`] -- Queue trigger fed from stdin.
//! - [`config_cmd`] -- Resolved configuration display.

pub mod config_cmd;
pub mod consume;
pub mod process;
pub mod serve;

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::info;

use fncast_types::config::Config;

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, that file must exist. Otherwise the
/// discovery chain is used:
/// 1. `FNCAST_CONFIG` env var
/// 2. `./fncast.json`
/// 3. `~/.fncast/config.json`
///
/// Returns a default `Config` if no config file is found. Environment
/// overrides (`FNCAST_INFERENCE_MODE`, `FNCAST_SERVER_HOST`,
/// `FNCAST_SERVER_PORT`) are applied on top.
pub async fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    fncast_core::config_loader::load_config(config_override.map(Path::new))
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))
}

/// Cancel `cancel` when Ctrl+C is received.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
        cancel.cancel();
    });
}
