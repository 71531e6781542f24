//! segmark command-line entry point

use anyhow::Result;
use clap::Parser;
use segmark_cli::commands::Commands;

/// Boundary-safe chunking for marked-up documents
#[derive(Debug, Parser)]
#[command(name = "segmark", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    Cli::parse().command.execute()
}
