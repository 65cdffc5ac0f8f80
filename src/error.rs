//! Error types for the playlist engine.
//!
//! Every failure the engine can report is recoverable: the caller gets a
//! typed outcome and the engine keeps its state. The library uses
//! `thiserror`; the CLI layer and `main` use `anyhow`.
//!
//! # Design
//!
//! - [`Error`]: everything an engine operation can report
//! - [`NoOpReason`]: why an operation had nothing to do
//! - Config file problems live in [`crate::config::ConfigError`]
//!
//! # Example
//!
//! ```ignore
//! use smart_shuffle::error::{Error, Result};
//!
//! fn queue(engine: &mut PlaylistEngine, id: &str) -> Result<()> {
//!     engine.force_next(id)?; // NotFound / NoOp propagate
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Playlist result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an operation left the playlist untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// No songs have been added yet
    EmptyPlaylist,
    /// Rewind needs a current entry plus one before it
    NoHistory,
    /// The song to move is the one currently playing
    AlreadyCurrent,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::EmptyPlaylist => "playlist is empty",
            Self::NoHistory => "no earlier song in history",
            Self::AlreadyCurrent => "song is already current",
        };
        f.write_str(msg)
    }
}

/// Playlist engine error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No song with this identifier
    #[error("Song not found: {0}")]
    NotFound(String),

    /// Operation had nothing to act on
    #[error("Nothing to do: {0}")]
    NoOp(NoOpReason),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn no_op(reason: NoOpReason) -> Self {
        Self::NoOp(reason)
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}
