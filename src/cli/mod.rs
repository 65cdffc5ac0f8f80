//! Command-line interface for smart-shuffle.
//!
//! This module provides the argument parser and the interactive command
//! shell that drives a [`PlaylistEngine`](crate::playlist::PlaylistEngine).

mod commands;
mod shell;

pub use commands::{Cli, run_command};
pub use shell::{Command, Flow, ParseError, Shell};
