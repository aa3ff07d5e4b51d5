//! PhotoMap CLI - turns a folder of geotagged photos into map-ready assets.
//!
//! Reads every photo in the input directory, keeps the ones that carry a GPS
//! position, writes a square thumbnail and a bounded large JPEG for each, and
//! records them in a JSON manifest for the map front-end.
//!
//! # Usage
//!
//! ```bash
//! # Run with photomap.toml from the working directory (or defaults)
//! photomap
//!
//! # Same, with explicit paths
//! photomap process --input-dir ~/Pictures/trip --manifest public/data.json
//!
//! # View configuration
//! photomap config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// PhotoMap - photo ingestion for map display.
#[derive(Parser, Debug)]
#[command(name = "photomap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of ./photomap.toml
    #[arg(short, long, global = true, env = "PHOTOMAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Process the input directory and write derivatives and the manifest (default)
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    // Commands load the config again and fail properly on errors.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Check your config file with `photomap config path`."
            );
            photomap_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("PhotoMap v{}", photomap_core::VERSION);

    match cli.command {
        Some(Commands::Process(args)) => cli::process::execute(args, cli.config).await,
        Some(Commands::Config(args)) => cli::config::execute(args, cli.config).await,
        None => cli::process::execute(cli::process::ProcessArgs::default(), cli.config).await,
    }
}
