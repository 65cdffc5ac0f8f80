//! Smart-Shuffle - interactive playlist shell.
//!
//! Reads commands from stdin and prints what the playlist engine plays.
//! Logs go to stderr so they never mix with the transcript.

use clap::Parser;
use smart_shuffle::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())))
        .init();

    cli::run_command(&args)
}
