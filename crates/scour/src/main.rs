//! Scour CLI - strip EXIF, GPS, and other metadata from JPEG and PNG files.
//!
//! # Usage
//!
//! ```bash
//! # Clean a single image (writes photo_cleaned.jpg)
//! scour clean photo.jpg
//!
//! # Clean a directory into a chosen destination
//! scour clean ./photos/ --output-dir ./clean/
//!
//! # Show what an image carries without touching it
//! scour inspect photo.jpg
//!
//! # View configuration
//! scour config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Scour - strip EXIF, GPS, and other metadata from JPEG and PNG files.
#[derive(Parser, Debug)]
#[command(name = "scour")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write metadata-free copies of images
    Clean(cli::clean::CleanArgs),

    /// Report the metadata an image carries, without modifying it
    Inspect(cli::inspect::InspectArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match scour_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `scour config path`."
            );
            scour_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Scour v{}", scour_core::VERSION);

    match cli.command {
        Commands::Clean(args) => cli::clean::execute(args, config).await,
        Commands::Inspect(args) => cli::inspect::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
