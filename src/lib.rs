//! Smart-Shuffle - a circular playlist with artist cooldown.
//!
//! The [`playlist`] module holds the engine: a circular song list, a
//! sliding window of recently played artists, a play history for rewinding
//! and one-shot "play next" overrides. The [`cli`] module wraps it in a
//! line-oriented shell.

pub mod cli;
pub mod config;
pub mod error;
pub mod playlist;
#[cfg(test)]
pub mod test_utils;
