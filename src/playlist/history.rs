//! Play history for rewinding.

use super::song::SongHandle;

/// Stack of played songs, most recent last.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<SongHandle>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: SongHandle) {
        self.entries.push(handle);
    }

    /// The most recently played song.
    pub fn top(&self) -> Option<SongHandle> {
        self.entries.last().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop the current entry and return the one below it.
    ///
    /// Needs at least two entries; otherwise nothing changes.
    pub fn rewind(&mut self) -> Option<SongHandle> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.top()
    }

    pub fn iter(&self) -> impl Iterator<Item = SongHandle> + '_ {
        self.entries.iter().copied()
    }
}
