//! Circular song registry.
//!
//! Songs live in an index-stable arena. Each node stores the handles of its
//! successor and predecessor, so relinking is O(1) and no node ever owns
//! another. For any non-empty registry the links form exactly one cycle.

use super::song::{Song, SongHandle};
use crate::error::{Error, NoOpReason, Result};
use tracing::debug;

#[derive(Debug, Clone)]
struct Node {
    song: Song,
    next: SongHandle,
    prev: SongHandle,
}

/// The circular, doubly-linked playlist.
#[derive(Debug, Clone, Default)]
pub struct SongRegistry {
    nodes: Vec<Node>,
    /// First song in listing order (None = empty)
    head: Option<SongHandle>,
    /// Now playing / about to play (None = empty)
    current: Option<SongHandle>,
}

impl SongRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<SongHandle> {
        self.head
    }

    /// The current-position reference.
    pub fn current(&self) -> Option<SongHandle> {
        self.current
    }

    pub(crate) fn set_current(&mut self, handle: SongHandle) {
        self.current = Some(handle);
    }

    /// Look up a song by handle.
    pub fn get(&self, handle: SongHandle) -> Option<&Song> {
        self.nodes.get(handle.0).map(|n| &n.song)
    }

    /// Song behind a handle issued by this registry.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this registry.
    pub fn song(&self, handle: SongHandle) -> &Song {
        &self.nodes[handle.0].song
    }

    pub(crate) fn get_mut(&mut self, handle: SongHandle) -> Option<&mut Song> {
        self.nodes.get_mut(handle.0).map(|n| &mut n.song)
    }

    /// Successor of `handle` in the cycle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this registry.
    pub fn next_of(&self, handle: SongHandle) -> SongHandle {
        self.nodes[handle.0].next
    }

    /// Predecessor of `handle` in the cycle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this registry.
    pub fn prev_of(&self, handle: SongHandle) -> SongHandle {
        self.nodes[handle.0].prev
    }

    /// Insert a song as the last element (just before head).
    ///
    /// The first song appended becomes both head and current position.
    /// Duplicate identifiers are accepted.
    pub fn append(&mut self, song: Song) -> SongHandle {
        let handle = SongHandle(self.nodes.len());

        match self.head {
            None => {
                self.nodes.push(Node {
                    song,
                    next: handle,
                    prev: handle,
                });
                self.head = Some(handle);
                self.current = Some(handle);
            }
            Some(head) => {
                let tail = self.nodes[head.0].prev;
                self.nodes.push(Node {
                    song,
                    next: head,
                    prev: tail,
                });
                self.nodes[tail.0].next = handle;
                self.nodes[head.0].prev = handle;
            }
        }

        handle
    }

    /// Find the first song with `id`, scanning one revolution from head.
    pub fn find_by_id(&self, id: &str) -> Option<SongHandle> {
        self.iter().find(|(_, song)| song.id == id).map(|(h, _)| h)
    }

    /// Detach the song with `id` and relink it right after the current
    /// position, marking it to play next regardless of cooldown.
    ///
    /// Moving the current song onto itself is a no-op and leaves its
    /// override marker untouched.
    pub fn move_after_current(&mut self, id: &str) -> Result<SongHandle> {
        let current = self.current.ok_or(Error::no_op(NoOpReason::EmptyPlaylist))?;
        let target = self.find_by_id(id).ok_or_else(|| Error::not_found(id))?;

        if target == current {
            return Err(Error::no_op(NoOpReason::AlreadyCurrent));
        }

        self.nodes[target.0].song.forced = true;

        // Unlink
        let (prev, next) = (self.nodes[target.0].prev, self.nodes[target.0].next);
        self.nodes[prev.0].next = next;
        self.nodes[next.0].prev = prev;
        if self.head == Some(target) {
            self.head = Some(next);
        }

        // Relink after current
        let after = self.nodes[current.0].next;
        self.nodes[current.0].next = target;
        self.nodes[target.0].prev = current;
        self.nodes[target.0].next = after;
        self.nodes[after.0].prev = target;

        debug!(id, after = %self.nodes[current.0].song.id, "Moved song after current");
        Ok(target)
    }

    /// Iterate one revolution in cycle order, starting at head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            registry: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }
}

/// Iterator over the registry in cycle order.
pub struct Iter<'a> {
    registry: &'a SongRegistry,
    cursor: Option<SongHandle>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SongHandle, &'a Song);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.cursor?;
        let node = &self.registry.nodes[handle.0];
        self.cursor = Some(node.next);
        self.remaining -= 1;
        Some((handle, &node.song))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
