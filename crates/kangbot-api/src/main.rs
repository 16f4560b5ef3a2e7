//! kangbot CLI entry point.
//!
//! Binary name: `kbot`
//!
//! Parses CLI arguments, sets up tracing, resolves configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;
use tracing::{Instrument, info_span};

use kangbot_observe::attrs;
use kangbot_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "kbot", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        verbosity: cli.verbose,
        quiet: cli.quiet,
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();

    if let Err(e) = result {
        eprintln!("\n  {} {e:#}\n", style("!").red().bold());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut state = AppState::init(cli.api_url.as_deref()).await?;
    let span = info_span!(attrs::SPAN_COMMAND, command = cli.command.name());

    async move {
        match cli.command {
            Commands::Chat { user } => cli::chat::loop_runner::run_chat_loop(&mut state, user).await,
            Commands::Ask { user, message } => {
                cli::ask::ask(&mut state, &user, &message.join(" "), cli.json, cli.quiet).await
            }
            Commands::Whoami { user } => cli::whoami::whoami(&mut state, &user, cli.json).await,
            Commands::Completions { .. } => unreachable!("handled in main"),
        }
    }
    .instrument(span)
    .await
}
