//! fft2d - runs the serial and band-parallel 2-D FFT engines on synthetic images.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod pattern;

use commands::{CompareCommand, RunCommand};

/// fft2d - drive the 2-D FFT engines.
///
/// Settings can come from a run file (YAML or JSON, see --config); flags
/// given on the command line take precedence.
#[derive(Parser)]
#[command(name = "fft2d")]
#[command(about = "Serial and band-parallel 2-D FFT driver")]
#[command(version)]
pub struct Cli {
    /// Run file with default settings (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform one synthetic image and report timings
    Run(RunCommand),
    /// Check the parallel engine against the serial one
    Compare(CompareCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run(cmd) => cmd.run(&cli),
        Commands::Compare(cmd) => cmd.run(&cli),
    }
}
