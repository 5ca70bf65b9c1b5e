//! `fncast process` -- run one payload through the pipeline.
//!
//! Prints the [`InferenceResult`] as pretty JSON on stdout. The process
//! exits with status 1 when the result is a failure.
//!
//! # Examples
//!
//! ```text
//! fncast process --payload hello --content-type text/plain
//! echo '{"source":"svc"}' | fncast process --mode echo
//! ```

use clap::Args;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use fncast_core::bootstrap::AppContext;
use fncast_services::TRIGGER_ATTRIBUTE;
use fncast_types::config::{Config, InferenceMode};
use fncast_types::{Event, InferenceResult};

/// Value of the `trigger` attribute on events produced by this command.
const CLI_TRIGGER: &str = "cli";

/// Arguments for the `fncast process` subcommand.
#[derive(Args)]
pub struct ProcessArgs {
    /// Payload text. Read from stdin when omitted.
    #[arg(short, long)]
    pub payload: Option<String>,

    /// Payload content type (default: application/json).
    #[arg(short = 't', long)]
    pub content_type: Option<String>,

    /// Inference mode (overrides config): uppercase, lowercase, echo.
    #[arg(short, long)]
    pub mode: Option<InferenceMode>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the `process` command. Returns whether the pipeline succeeded.
pub async fn run(args: ProcessArgs) -> anyhow::Result<bool> {
    let mut config = super::load_config(args.config.as_deref()).await?;
    if let Some(mode) = args.mode {
        config.inference.mode = mode;
    }

    let payload = match args.payload {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let cancel = CancellationToken::new();
    super::cancel_on_ctrl_c(cancel.clone());

    let result = process_payload(config, payload, args.content_type, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.success())
}

/// Build the pipeline from `config` and process a single payload.
pub async fn process_payload(
    config: Config,
    payload: String,
    content_type: Option<String>,
    cancel: &CancellationToken,
) -> anyhow::Result<InferenceResult> {
    let ctx = AppContext::new(config);
    let event = Event::new(None, None, payload, content_type.unwrap_or_default())
        .with_attribute(TRIGGER_ATTRIBUTE, CLI_TRIGGER);
    Ok(ctx.orchestrator().process(&event, cancel).await?)
}
