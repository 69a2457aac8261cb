//! FolderTally: record folder listings in a log and tally them.
//!
//! Thin binary entry point. All logic lives in the `foldertally-core`
//! and `foldertally-cli` crates.

use clap::Parser;
use foldertally_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v/-vv raise the default WARN level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("FolderTally starting");

    foldertally_cli::run(cli)
}
