//! AirSketch CLI: headless driver for the sketching pipeline.
//!
//! Usage:
//!   airsketch validate <CONFIG>          Validate a session config file
//!   airsketch defaults                   Print the default session config
//!   airsketch replay <LOG> [OPTIONS]     Replay a recorded observation log

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use airsketch_common::config::{LoggingConfig, SessionConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "airsketch",
    about = "Draw in the air with hand gestures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a session configuration file
    Validate {
        /// Path to the JSON config
        path: PathBuf,
    },

    /// Print the default session configuration as JSON
    Defaults,

    /// Replay a JSON-lines observation log through the pipeline
    Replay {
        /// Path to the observation log
        log: PathBuf,

        /// Session config (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the final canvas as a binary PPM image
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Print the final frame report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A replay config may carry its own logging section.
    let session_config = match &cli.command {
        Commands::Replay {
            config: Some(path), ..
        } => Some(SessionConfig::load_from(path)?),
        _ => None,
    };
    let mut logging = session_config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    airsketch_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Defaults => commands::defaults::run(),
        Commands::Replay {
            log,
            snapshot,
            json,
            ..
        } => {
            let config = session_config.unwrap_or_default();
            commands::replay::run(log, config, snapshot, json).await
        }
    }
}
