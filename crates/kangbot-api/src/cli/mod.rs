//! CLI command definitions for the `kbot` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod whoami;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with the kangbot assistant from the terminal.
#[derive(Parser)]
#[command(name = "kbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and replies.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL. Overrides config.toml and KANGBOT_API_URL.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Write logs as JSON lines to stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat {
        /// User id to log in as. Prompted for when omitted.
        #[arg(long, short)]
        user: Option<String>,
    },

    /// Send a single message and print the reply.
    Ask {
        /// User id to log in as.
        #[arg(long, short)]
        user: String,

        /// Message text. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show the profile the backend has for a user.
    Whoami {
        /// User id to log in as.
        #[arg(long, short)]
        user: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Commands {
    /// Subcommand name, for spans.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Chat { .. } => "chat",
            Commands::Ask { .. } => "ask",
            Commands::Whoami { .. } => "whoami",
            Commands::Completions { .. } => "completions",
        }
    }
}
