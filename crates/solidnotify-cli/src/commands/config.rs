//! Configuration management commands.

use super::load_config;
use clap::Args;
use solidnotify_core::{paths, NotifyConfig};
use std::path::{Path, PathBuf};

/// Config command arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(config_path)?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Path => {
            println!("{}", resolve_path(config_path)?.display());
        }

        ConfigCommand::Init { force } => {
            let path = resolve_path(config_path)?;
            init(&path, force)?;
            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Validate => {
            let config = load_config(config_path)?;
            match config.validate() {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            }
        }
    }

    Ok(())
}

fn resolve_path(config_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Write the default configuration to `path`.
fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }
    NotifyConfig::default().save(path)?;
    Ok(())
}
