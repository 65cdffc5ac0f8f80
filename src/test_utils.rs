//! Test utilities and fixtures for smart-shuffle tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{engine_with, assert_single_cycle};
//!
//! let mut engine = engine_with(1, &[("S1", "A"), ("S2", "B")]);
//! engine.advance().unwrap();
//! assert_single_cycle(engine.registry());
//! ```

use std::collections::HashSet;

use crate::playlist::{PlaylistEngine, Song, SongRegistry};

/// Builds a registry from `(id, artist)` pairs. Titles are `"<id> title"`.
pub fn registry_with(songs: &[(&str, &str)]) -> SongRegistry {
    let mut reg = SongRegistry::new();
    for (id, artist) in songs {
        reg.append(Song::new(*id, *artist, format!("{id} title")));
    }
    reg
}

/// Builds an engine with cooldown window `window` and the given songs.
pub fn engine_with(window: usize, songs: &[(&str, &str)]) -> PlaylistEngine {
    let mut engine = PlaylistEngine::new(window);
    for (id, artist) in songs {
        engine.add_song(*id, *artist, format!("{id} title"));
    }
    engine
}

/// Song identifiers in cycle order starting at head.
pub fn ids_in_order(reg: &SongRegistry) -> Vec<String> {
    reg.iter().map(|(_, song)| song.id.clone()).collect()
}

/// Asserts that the registry forms exactly one cycle through every node,
/// in both directions, and that head and current are on it.
///
/// # Panics
///
/// Panics with a description of the first broken link.
pub fn assert_single_cycle(reg: &SongRegistry) {
    let n = reg.len();
    let head = reg.head().expect("non-empty registry has a head");
    let current = reg.current().expect("non-empty registry has a current song");

    let mut seen = HashSet::new();
    let mut cursor = head;
    for step in 0..n {
        assert!(seen.insert(cursor), "node {cursor:?} revisited at step {step}");
        let next = reg.next_of(cursor);
        assert_eq!(reg.prev_of(next), cursor, "prev(next({cursor:?})) is not {cursor:?}");
        cursor = next;
    }
    assert_eq!(cursor, head, "successor walk of {n} steps did not return to head");
    assert!(seen.contains(&current), "current {current:?} is not on the cycle");

    let mut cursor = head;
    for _ in 0..n {
        cursor = reg.prev_of(cursor);
    }
    assert_eq!(cursor, head, "predecessor walk of {n} steps did not return to head");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_keeps_order() {
        let reg = registry_with(&[("S1", "A"), ("S2", "B")]);
        assert_eq!(ids_in_order(&reg), vec!["S1", "S2"]);
        assert_single_cycle(&reg);
    }

    #[test]
    fn test_engine_with_sets_window() {
        let engine = engine_with(3, &[("S1", "A")]);
        assert_eq!(engine.cooldown().capacity(), 3);
        assert_eq!(engine.current().unwrap().title, "S1 title");
    }
}
