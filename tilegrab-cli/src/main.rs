//! tilegrab CLI - Command-line interface
//!
//! This binary provides a command-line interface to the tilegrab library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::common::{DownloadOverrides, StrategyArg};
use error::CliError;

#[derive(Parser)]
#[command(name = "tilegrab")]
#[command(version = tilegrab::VERSION)]
#[command(about = "Download full-resolution images from IIIF archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every image of an archive
    Download {
        /// Archive URL; `/manifest.json` is appended
        archive_url: String,

        /// Output directory (default from config, else ./downloads)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Fetch strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Tiles in flight with the fast strategy (1-32)
        #[arg(long)]
        max_in_flight: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Attempts per tile, including the first
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        attempts: Option<u32>,

        /// Stop dispatching new tiles once one failed
        #[arg(long)]
        cancel_on_failure: bool,

        /// JPEG quality of saved images (1-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Enable debug logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Show size, probed tile size and grid of one image service
    Probe {
        /// Image service base URL
        service_url: String,

        /// Edge length of the probe region
        #[arg(long)]
        size: Option<u32>,

        /// Enable debug logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Create the default configuration file
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Download {
            archive_url,
            output,
            strategy,
            max_in_flight,
            timeout,
            attempts,
            cancel_on_failure,
            quality,
            verbose,
        } => commands::download::run(commands::download::DownloadArgs {
            archive_url,
            output,
            overrides: DownloadOverrides {
                strategy,
                max_in_flight,
                timeout_secs: timeout,
                attempts,
                cancel_on_failure,
                quality,
            },
            verbose,
        }),
        Commands::Probe {
            service_url,
            size,
            verbose,
        } => commands::probe::run(commands::probe::ProbeArgs {
            service_url,
            size,
            verbose,
        }),
        Commands::Init => commands::init::run(),
    };

    if let Err(e) = result {
        e.exit();
    }
}
