//! GloKit CLI - Command-line interface for GLO model tools

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glokit")]
#[command(about = "GloKit: GLO model tools", long_about = None)]
#[command(version = crate::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the GloKit CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging; RUST_LOG=glokit=debug shows codec progress
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
