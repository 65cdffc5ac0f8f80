//! Artist cooldown window.
//!
//! Keeps the last `capacity` played artists in play order together with a
//! per-artist count, so "is this artist still cooling down?" is a single
//! map lookup.

use std::collections::{HashMap, VecDeque};

/// Sliding window over recently played artists.
#[derive(Debug, Clone, Default)]
pub struct CooldownWindow {
    /// Maximum window length (K). Zero disables the restriction.
    capacity: usize,
    /// Artists in play order, oldest first
    window: VecDeque<String>,
    /// Occurrences of each artist currently in `window`
    counts: HashMap<String, usize>,
}

impl CooldownWindow {
    /// Create an empty window of size `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change K.
    ///
    /// The window is not trimmed here; a shrunk window catches up one
    /// eviction per [`record`](Self::record).
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// True iff `artist` occurs in the window.
    pub fn is_on_cooldown(&self, artist: &str) -> bool {
        self.counts.get(artist).is_some_and(|&n| n > 0)
    }

    /// Push `artist` and evict the oldest entry if the window overflowed.
    ///
    /// Returns the evicted artist. With K = 0 this is always the artist
    /// just recorded.
    pub fn record(&mut self, artist: &str) -> Option<String> {
        self.window.push_back(artist.to_string());
        *self.counts.entry(artist.to_string()).or_insert(0) += 1;

        if self.window.len() <= self.capacity {
            return None;
        }

        let evicted = self.window.pop_front()?;
        if let Some(count) = self.counts.get_mut(&evicted) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&evicted);
            }
        }
        Some(evicted)
    }

    /// Window contents, oldest to newest.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.window.iter().map(String::as_str)
    }

    /// Sum of all artist counts. Always equals [`len`](Self::len).
    pub fn total_count(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(w: &CooldownWindow) -> Vec<&str> {
        w.contents().collect()
    }

    #[test]
    fn test_record_within_capacity() {
        let mut w = CooldownWindow::new(2);
        assert_eq!(w.record("A"), None);
        assert_eq!(w.record("B"), None);
        assert!(w.is_on_cooldown("A"));
        assert!(w.is_on_cooldown("B"));
        assert_eq!(contents(&w), vec!["A", "B"]);
    }

    #[test]
    fn test_record_evicts_oldest() {
        let mut w = CooldownWindow::new(2);
        w.record("A");
        w.record("B");
        assert_eq!(w.record("C"), Some("A".to_string()));
        assert!(!w.is_on_cooldown("A"));
        assert_eq!(contents(&w), vec!["B", "C"]);
    }

    #[test]
    fn test_repeated_artist_counts() {
        let mut w = CooldownWindow::new(2);
        w.record("A");
        w.record("A");
        assert_eq!(w.record("B"), Some("A".to_string()));
        // One "A" is still inside the window
        assert!(w.is_on_cooldown("A"));
        assert_eq!(w.total_count(), 2);
    }

    #[test]
    fn test_zero_capacity_evicts_immediately() {
        let mut w = CooldownWindow::new(0);
        assert_eq!(w.record("A"), Some("A".to_string()));
        assert!(!w.is_on_cooldown("A"));
        assert!(w.is_empty());
        assert_eq!(w.total_count(), 0);
    }

    #[test]
    fn test_shrink_trims_lazily() {
        let mut w = CooldownWindow::new(3);
        w.record("A");
        w.record("B");
        w.record("C");

        w.set_capacity(1);
        assert_eq!(w.len(), 3);
        assert!(w.is_on_cooldown("A"));

        // One eviction per record
        assert_eq!(w.record("D"), Some("A".to_string()));
        assert_eq!(contents(&w), vec!["B", "C", "D"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Window never exceeds K and counts always match its length
        #[test]
        fn window_bounded_and_counted(
            k in 0usize..5,
            plays in prop::collection::vec(0u8..4, 0..50),
        ) {
            let mut w = CooldownWindow::new(k);
            for p in plays {
                let artist = format!("artist{p}");
                w.record(&artist);
                prop_assert!(w.len() <= k);
                prop_assert_eq!(w.total_count(), w.len());
                if k >= 1 {
                    prop_assert!(w.is_on_cooldown(&artist));
                } else {
                    prop_assert!(!w.is_on_cooldown(&artist));
                }
            }
        }
    }
}
