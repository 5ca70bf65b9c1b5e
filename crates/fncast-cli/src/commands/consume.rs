//! `fncast consume` -- feed stdin lines to the queue trigger.
//!
//! Every non-empty line becomes one queue message. Messages are processed
//! in order by a single [`QueueConsumer`]; the command returns once stdin
//! is exhausted and the queue has drained, or on Ctrl+C.
//!
//! With `--emit`, every routed result is also written to stdout as one
//! JSON line (`{"eventId": ..., "result": {...}}`).

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use fncast_core::bootstrap::AppContext;
use fncast_core::pipeline::output_router::{ChannelOutputRouter, RoutedOutput};
use fncast_services::queue::{IngestQueue, QueueConsumer};
use fncast_types::config::Config;

/// Arguments for the `fncast consume` subcommand.
#[derive(Args)]
pub struct ConsumeArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print each routed result to stdout as a JSON line.
    #[arg(long)]
    pub emit: bool,
}

/// Run the `consume` command.
pub async fn run(args: ConsumeArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref()).await?;
    let cancel = CancellationToken::new();
    super::cancel_on_ctrl_c(cancel.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let emit = args.emit.then(tokio::io::stdout);
    let (processed, _) = consume_lines(config, stdin, emit, &cancel).await?;
    info!(processed, "stdin exhausted");
    Ok(())
}

/// Publish each line of `reader` to an ingest queue and drain it.
///
/// Returns the number of processed messages and, when `emit` was given,
/// the writer back after every routed result has been written to it.
pub async fn consume_lines<R, W>(
    config: Config,
    reader: R,
    emit: Option<W>,
    cancel: &CancellationToken,
) -> anyhow::Result<(usize, Option<W>)>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (queue, rx) = IngestQueue::from_config(&config.queue);

    let (ctx, printer) = match emit {
        Some(out) => {
            // Every result must reach the writer, so routing waits for the
            // printer instead of dropping results on a full channel.
            let (router, routed_rx) = ChannelOutputRouter::channel(config.queue.capacity);
            let ctx = AppContext::with_router(config, Arc::new(router.awaiting_capacity()));
            (ctx, Some(spawn_printer(routed_rx, out)))
        }
        None => (AppContext::new(config), None),
    };

    let consumer = QueueConsumer::new(queue.name(), ctx.orchestrator().clone(), rx);
    // The consumer holds the only remaining handle on the pipeline, so the
    // printer's channel closes when the consumer finishes.
    drop(ctx);
    let consumer_cancel = cancel.clone();
    let consumer = tokio::spawn(async move { consumer.run(&consumer_cancel).await });

    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        if queue.publish_async(line).await.is_err() {
            // Consumer stopped (cancelled); nothing left to feed.
            break;
        }
    }
    drop(queue);

    let processed = consumer.await?;
    let out = match printer {
        Some(handle) => Some(handle.await??),
        None => None,
    };
    Ok((processed, out))
}

fn spawn_printer<W>(
    mut rx: mpsc::Receiver<RoutedOutput>,
    mut out: W,
) -> JoinHandle<anyhow::Result<W>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(routed) = rx.recv().await {
            let mut line = serde_json::to_vec(&routed)?;
            line.push(b'\n');
            out.write_all(&line).await?;
        }
        out.flush().await?;
        Ok(out)
    })
}
