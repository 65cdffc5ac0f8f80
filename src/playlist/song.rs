//! Song records and the handles used to refer to them.

use serde::Serialize;
use std::fmt;

/// Stable handle to a song inside a [`SongRegistry`](super::SongRegistry).
///
/// Handles are arena indices. They stay valid for the lifetime of the
/// registry because songs are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongHandle(pub(crate) usize);

impl SongHandle {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A song in the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    /// User-supplied identifier (not necessarily unique)
    pub id: String,
    /// Artist name, used for cooldown
    pub artist: String,
    /// Display title
    pub title: String,
    /// Play-next priority: bypasses cooldown once
    #[serde(skip)]
    pub(crate) forced: bool,
}

impl Song {
    /// Create a song with the override marker cleared.
    pub fn new(id: impl Into<String>, artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artist: artist.into(),
            title: title.into(),
            forced: false,
        }
    }

    /// Whether the song was forced to play next and has not played since.
    pub fn is_forced(&self) -> bool {
        self.forced
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.artist)
    }
}
