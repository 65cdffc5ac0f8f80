//! CLI argument definitions and the entry point that wires config, engine
//! and shell together.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};

use super::shell::Shell;
use crate::config::{self, Config, OutputFormat};
use crate::playlist::PlaylistEngine;

/// Smart-Shuffle playlist shell
///
/// Reads playlist commands (ADD_SONG, PLAY, NEXT, PREV, ADD_NEXT,
/// SET_RESTRICTION_K) from standard input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cooldown window: how many recent artists are held back
    #[arg(short = 'k', long, env = "SMART_SHUFFLE_COOLDOWN")]
    pub cooldown: Option<usize>,

    /// Config file (default: <config dir>/smart-shuffle/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Don't print the candidates examined by NEXT
    #[arg(long)]
    pub no_trace: bool,

    /// Prompt shown before each command (interactive only)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Log selection decisions to stderr (-vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(k) = self.cooldown {
            config.playlist.cooldown_window = k;
        }
        if let Some(format) = self.format {
            config.shell.format = format;
        }
        if self.no_trace {
            config.shell.show_trace = false;
        }
        if let Some(prompt) = &self.prompt {
            config.shell.prompt = prompt.clone();
        }
        config
    }

    /// Default log filter for `tracing-subscriber` when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "smart_shuffle=warn",
            1 => "smart_shuffle=debug",
            _ => "smart_shuffle=trace",
        }
    }
}

/// Run the shell on stdin/stdout until EXIT or end of input.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let file_config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    let mut config = cli.apply(file_config);
    debug!(?config, "Effective configuration");

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        // No prompt for piped input
        config.shell.prompt.clear();
    }

    let engine = PlaylistEngine::new(config.playlist.cooldown_window);
    info!(window = config.playlist.cooldown_window, "Starting playlist shell");

    let mut shell = Shell::new(engine, config.shell, std::io::stdout().lock());
    shell.run(stdin.lock())?;
    Ok(())
}
