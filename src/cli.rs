//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Album Order - Preview album covers, thumbnails and ordering
#[derive(Parser, Debug)]
#[command(name = "album-order")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the cover, thumbnails and full ordering of an album
    Resolve(commands::resolve::ResolveArgs),

    /// List the album's images as the resolver sees them
    Keys(commands::keys::KeysArgs),

    /// Check whether an image exists in an album
    Exists(commands::exists::ExistsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .filter_level(self.log_level)
            .parse_default_env()
            .init();

        match self.command {
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Keys(args) => commands::keys::execute(args),
            Commands::Exists(args) => commands::exists::execute(args),
        }
    }
}
