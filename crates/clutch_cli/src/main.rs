//! Command-line front end for the drive engine.
//!
//! Run with: `clutch <command>`; set `RUST_LOG=debug` for per-play traces.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Simulate, Validate};
use tracing_subscriber::EnvFilter;

/// Card-driven American football drive engine
#[derive(Parser)]
#[command(name = "clutch")]
#[command(about = "Play and inspect Clutch Play games", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Autoplay a full game and print the result
    Simulate(Simulate),

    /// Check card and team files for structural problems
    Validate(Validate),
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::Validate(cmd) => cmd.execute(),
    }
}
