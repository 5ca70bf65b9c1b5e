//! `fncast` -- CLI binary for the fncast event pipeline.
//!
//! Provides the following subcommands:
//!
//! - `fncast process` -- Run a single payload through the pipeline.
//! - `fncast serve` -- Start the HTTP trigger.
//! - `fncast consume` -- Treat stdin lines as queue messages.
//! - `fncast config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// fncast event pipeline CLI.
#[derive(Parser)]
#[command(name = "fncast", about = "fncast event pipeline CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run a single payload through the pipeline and print the result.
    Process(commands::process::ProcessArgs),

    /// Start the HTTP trigger (health + ingest endpoints).
    Serve(commands::serve::ServeArgs),

    /// Consume stdin lines as queue messages.
    Consume(commands::consume::ConsumeArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `fncast config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration.
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Show a specific configuration section.
    Section {
        /// Section name (e.g., "inference", "server", "queue").
        name: String,

        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => {
            let success = commands::process::run(args).await?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Consume(args) => commands::consume::run(args).await?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = commands::load_config(config.as_deref()).await?;
                commands::config_cmd::config_show(&cfg);
            }
            ConfigCmd::Section { name, config } => {
                let cfg = commands::load_config(config.as_deref()).await?;
                commands::config_cmd::config_section(&cfg, &name);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fncast_types::config::InferenceMode;

    #[test]
    fn cli_parses_without_error() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_help_contains_binary_name() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("fncast"));
    }

    #[test]
    fn cli_has_all_subcommands() {
        let cmd = Cli::command();
        let sub_names: Vec<&str> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(sub_names.contains(&"process"));
        assert!(sub_names.contains(&"serve"));
        assert!(sub_names.contains(&"consume"));
        assert!(sub_names.contains(&"config"));
    }

    #[test]
    fn cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["fncast", "--verbose", "serve"]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["fncast", "serve", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn process_args_parse() {
        let cli = Cli::try_parse_from([
            "fncast",
            "process",
            "--payload",
            "hello",
            "--content-type",
            "text/plain",
            "--mode",
            "lowercase",
        ])
        .unwrap();
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.payload.as_deref(), Some("hello"));
                assert_eq!(args.content_type.as_deref(), Some("text/plain"));
                assert_eq!(args.mode, Some(InferenceMode::Lowercase));
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn process_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["fncast", "process", "--mode", "reverse"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_overrides_parse() {
        let cli =
            Cli::try_parse_from(["fncast", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
                assert!(args.config.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn consume_emit_flag() {
        let cli = Cli::try_parse_from(["fncast", "consume", "--emit"]).unwrap();
        match cli.command {
            Commands::Consume(args) => assert!(args.emit),
            _ => panic!("expected consume"),
        }
    }

    #[test]
    fn config_section_parse() {
        let cli =
            Cli::try_parse_from(["fncast", "config", "section", "inference", "-c", "x.json"])
                .unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigCmd::Section { name, config },
            } => {
                assert_eq!(name, "inference");
                assert_eq!(config.as_deref(), Some("x.json"));
            }
            _ => panic!("expected config section"),
        }
    }
}
