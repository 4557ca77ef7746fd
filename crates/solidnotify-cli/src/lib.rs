//! solidnotify command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// solidnotify - subscribe to Solid storage notifications
#[derive(Parser)]
#[command(name = "solidnotify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true, env = "SOLIDNOTIFY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter directive for the requested verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "solidnotify=info",
            1 => "solidnotify=debug",
            _ => "solidnotify=trace",
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Discover the notification gateway for a topic
    Discover(commands::TargetArgs),

    /// Negotiate a WebSocket endpoint for a topic
    Negotiate(commands::TargetArgs),

    /// Subscribe to a topic and print notifications as JSON lines
    Subscribe(commands::subscribe::SubscribeArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Discover(args) => commands::discover::run(args, config_path).await,
        Commands::Negotiate(args) => commands::negotiate::run(args, config_path).await,
        Commands::Subscribe(args) => commands::subscribe::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("solidnotify {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
