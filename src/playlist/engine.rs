//! Selection engine: ties the registry, cooldown window and history
//! together behind the playlist operations.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::cooldown::CooldownWindow;
use super::events::{
    CandidateCheck, EventBus, PlayEvent, PlaybackEvent, SelectionReason, SelectionTrace, Verdict,
};
use super::history::HistoryStack;
use super::registry::SongRegistry;
use super::song::{Song, SongHandle};
use crate::error::{Error, NoOpReason, Result};

/// An engine shared across threads. Every operation holds the one lock for
/// its whole duration.
pub type SharedEngine = Arc<Mutex<PlaylistEngine>>;

/// The playlist engine.
#[derive(Debug, Default)]
pub struct PlaylistEngine {
    registry: SongRegistry,
    cooldown: CooldownWindow,
    history: HistoryStack,
    events: EventBus,
}

impl PlaylistEngine {
    /// Create an empty engine with a cooldown window of `cooldown_window`
    /// artists.
    pub fn new(cooldown_window: usize) -> Self {
        Self {
            cooldown: CooldownWindow::new(cooldown_window),
            ..Self::default()
        }
    }

    /// Wrap the engine for use from several threads.
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn registry(&self) -> &SongRegistry {
        &self.registry
    }

    pub fn cooldown(&self) -> &CooldownWindow {
        &self.cooldown
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Song at the current position, if any.
    pub fn current(&self) -> Option<&Song> {
        self.registry.current().map(|h| self.registry.song(h))
    }

    /// Receive every [`PlaybackEvent`] from now on.
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Append a song to the end of the playlist.
    pub fn add_song(
        &mut self,
        id: impl Into<String>,
        artist: impl Into<String>,
        title: impl Into<String>,
    ) -> SongHandle {
        let handle = self.registry.append(Song::new(id, artist, title));
        debug!(id = %self.registry.song(handle).id, len = self.registry.len(), "Added song");
        handle
    }

    /// Look up a song by identifier (first match).
    pub fn find(&self, id: &str) -> Result<&Song> {
        self.registry
            .find_by_id(id)
            .map(|h| self.registry.song(h))
            .ok_or_else(|| Error::not_found(id))
    }

    /// Change the cooldown window size. Existing entries are kept until
    /// later plays push them out.
    pub fn set_cooldown_window(&mut self, window: usize) {
        self.cooldown.set_capacity(window);
        info!(window, "Cooldown window changed");
        self.events
            .publish(&PlaybackEvent::CooldownChanged { window });
    }

    /// Move `id` right after the current song and let it bypass cooldown
    /// on its next selection.
    pub fn force_next(&mut self, id: &str) -> Result<&Song> {
        let handle = self.registry.move_after_current(id)?;
        let song = self.registry.song(handle);
        self.events.publish(&PlaybackEvent::Queued {
            id: song.id.clone(),
            artist: song.artist.clone(),
            title: song.title.clone(),
        });
        Ok(self.registry.song(handle))
    }

    /// Play the song at the current position without moving.
    pub fn play(&mut self) -> Result<PlayEvent> {
        let current = self
            .registry
            .current()
            .ok_or(Error::no_op(NoOpReason::EmptyPlaylist))?;
        Ok(self.select(current, SelectionReason::Current, SelectionTrace::new()))
    }

    /// Pick the next playable song and play it.
    ///
    /// Walks forward from the current song. A forced song is taken
    /// immediately; a song whose artist is cooling down is skipped. If
    /// every other song is skipped, the immediate successor plays anyway.
    pub fn advance(&mut self) -> Result<PlayEvent> {
        let start = self
            .registry
            .current()
            .ok_or(Error::no_op(NoOpReason::EmptyPlaylist))?;

        let mut trace = SelectionTrace::new();
        let mut candidate = self.registry.next_of(start);

        while candidate != start {
            let song = self.registry.song(candidate);
            let verdict = if song.is_forced() {
                Verdict::AcceptedOverride
            } else if self.cooldown.is_on_cooldown(&song.artist) {
                Verdict::SkippedCooldown
            } else {
                Verdict::Accepted
            };

            debug!(id = %song.id, artist = %song.artist, ?verdict, "Checked candidate");
            trace.push(CandidateCheck {
                id: song.id.clone(),
                artist: song.artist.clone(),
                verdict,
            });

            match verdict {
                Verdict::AcceptedOverride => {
                    return Ok(self.select(candidate, SelectionReason::Override, trace));
                }
                Verdict::Accepted => {
                    return Ok(self.select(candidate, SelectionReason::Natural, trace));
                }
                Verdict::SkippedCooldown => candidate = self.registry.next_of(candidate),
            }
        }

        let fallback = self.registry.next_of(start);
        debug!(id = %self.registry.song(fallback).id, "All candidates cooling down, falling back");
        Ok(self.select(fallback, SelectionReason::Fallback, trace))
    }

    /// Step back to the previously played song.
    ///
    /// Pure navigation: nothing is pushed and the cooldown window is left
    /// as it is.
    pub fn rewind(&mut self) -> Result<&Song> {
        let handle = self
            .history
            .rewind()
            .ok_or(Error::no_op(NoOpReason::NoHistory))?;
        self.registry.set_current(handle);

        let song = self.registry.song(handle);
        debug!(id = %song.id, "Rewound");
        self.events.publish(&PlaybackEvent::Rewound {
            id: song.id.clone(),
            artist: song.artist.clone(),
        });
        Ok(self.registry.song(handle))
    }

    fn select(
        &mut self,
        handle: SongHandle,
        reason: SelectionReason,
        trace: SelectionTrace,
    ) -> PlayEvent {
        self.registry.set_current(handle);
        self.history.push(handle);

        let artist = self.registry.song(handle).artist.clone();
        let evicted = self.cooldown.record(&artist);

        if let Some(song) = self.registry.get_mut(handle) {
            song.forced = false;
        }

        let song = self.registry.song(handle);
        let event = PlayEvent {
            id: song.id.clone(),
            artist,
            title: song.title.clone(),
            window: self.cooldown.contents().map(str::to_string).collect(),
            evicted,
            reason,
            trace,
        };

        debug!(id = %event.id, ?reason, evicted = ?event.evicted, "Playing");
        self.events.publish(&PlaybackEvent::Played(event.clone()));
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{engine_with, ids_in_order};

    #[test]
    fn test_empty_engine_is_idle() {
        let mut engine = PlaylistEngine::new(2);
        assert!(engine.current().is_none());
        assert!(matches!(
            engine.play(),
            Err(Error::NoOp(NoOpReason::EmptyPlaylist))
        ));
        assert!(matches!(
            engine.advance(),
            Err(Error::NoOp(NoOpReason::EmptyPlaylist))
        ));
        assert!(matches!(
            engine.rewind(),
            Err(Error::NoOp(NoOpReason::NoHistory))
        ));
    }

    #[test]
    fn test_cooldown_expiry_scenario() {
        let mut engine = engine_with(0, &[("S1", "A"), ("S2", "B"), ("S3", "A")]);
        engine.set_cooldown_window(1);

        let first = engine.play().unwrap();
        assert_eq!(first.id, "S1");
        assert_eq!(first.window, vec!["A"]);
        assert_eq!(first.evicted, None);

        let second = engine.advance().unwrap();
        assert_eq!(second.id, "S2");
        assert_eq!(second.window, vec!["B"]);
        assert_eq!(second.evicted.as_deref(), Some("A"));

        let third = engine.advance().unwrap();
        assert_eq!(third.id, "S3");
        assert_eq!(third.window, vec!["A"]);
        assert_eq!(third.evicted.as_deref(), Some("B"));
        assert_eq!(third.reason, SelectionReason::Natural);
    }

    #[test]
    fn test_advance_skips_artist_on_cooldown() {
        let mut engine = engine_with(2, &[("S1", "A"), ("S2", "A"), ("S3", "B")]);
        engine.play().unwrap();

        let event = engine.advance().unwrap();
        assert_eq!(event.id, "S3");
        assert_eq!(event.trace.len(), 2);
        assert_eq!(event.trace[0].verdict, Verdict::SkippedCooldown);
        assert_eq!(event.trace[1].verdict, Verdict::Accepted);
    }

    #[test]
    fn test_override_beats_cooldown() {
        let mut engine = engine_with(2, &[("S1", "A"), ("S2", "B"), ("S3", "A")]);
        engine.play().unwrap();

        let queued = engine.force_next("S3").unwrap();
        assert!(queued.is_forced());
        assert_eq!(ids_in_order(engine.registry()), vec!["S1", "S3", "S2"]);

        let event = engine.advance().unwrap();
        assert_eq!(event.id, "S3");
        assert_eq!(event.reason, SelectionReason::Override);
        assert!(!engine.current().unwrap().is_forced());
        assert_eq!(event.window, vec!["A", "A"]);
    }

    #[test]
    fn test_fallback_when_everything_cools_down() {
        let mut engine = engine_with(3, &[("S1", "A"), ("S2", "A"), ("S3", "A")]);
        engine.play().unwrap();

        let event = engine.advance().unwrap();
        assert_eq!(event.id, "S2");
        assert_eq!(event.reason, SelectionReason::Fallback);
        assert_eq!(event.trace.len(), 2);
    }

    #[test]
    fn test_single_song_replays_itself() {
        let mut engine = engine_with(1, &[("S1", "A")]);
        engine.play().unwrap();

        let event = engine.advance().unwrap();
        assert_eq!(event.id, "S1");
        assert_eq!(event.reason, SelectionReason::Fallback);
        assert!(event.trace.is_empty());
    }

    #[test]
    fn test_zero_window_never_skips() {
        let mut engine = engine_with(0, &[("S1", "A"), ("S2", "A"), ("S3", "A")]);
        engine.play().unwrap();

        for expected in ["S2", "S3", "S1"] {
            let event = engine.advance().unwrap();
            assert_eq!(event.id, expected);
            assert_eq!(event.evicted.as_deref(), Some("A"));
            assert!(event.window.is_empty());
            assert!(
                event
                    .trace
                    .iter()
                    .all(|c| c.verdict != Verdict::SkippedCooldown)
            );
        }
    }

    #[test]
    fn test_rewind_restores_position_not_window() {
        let mut engine = engine_with(2, &[("S1", "A"), ("S2", "B"), ("S3", "C")]);
        engine.play().unwrap();
        engine.advance().unwrap();
        let window_before: Vec<String> =
            engine.cooldown().contents().map(str::to_string).collect();

        let song = engine.rewind().unwrap();
        assert_eq!(song.id, "S1");
        assert_eq!(engine.current().unwrap().id, "S1");
        assert_eq!(engine.history().len(), 1);

        let window_after: Vec<String> =
            engine.cooldown().contents().map(str::to_string).collect();
        assert_eq!(window_before, window_after);

        // Only one entry left
        assert!(matches!(
            engine.rewind(),
            Err(Error::NoOp(NoOpReason::NoHistory))
        ));
    }

    #[test]
    fn test_find_reports_not_found() {
        let engine = engine_with(0, &[("S1", "A")]);
        assert_eq!(engine.find("S1").unwrap().artist, "A");
        assert!(matches!(engine.find("S2"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_subscribers_see_plays() {
        let mut engine = engine_with(1, &[("S1", "A"), ("S2", "B")]);
        let events = engine.subscribe();

        engine.play().unwrap();
        engine.force_next("S2").ok();
        engine.advance().unwrap();

        let received: Vec<PlaybackEvent> = events.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(&received[0], PlaybackEvent::Played(e) if e.id == "S1"));
        assert!(matches!(&received[1], PlaybackEvent::Queued { id, .. } if id == "S2"));
        assert!(matches!(
            &received[2],
            PlaybackEvent::Played(e) if e.reason == SelectionReason::Override
        ));
    }

    #[test]
    fn test_shared_engine_serializes_access() {
        let shared = PlaylistEngine::new(0).into_shared();

        let workers: Vec<_> = (0..4)
            .map(|t| {
                let engine = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        engine.lock().add_song(format!("S{t}-{i}"), "A", "t");
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let engine = shared.lock();
        assert_eq!(engine.registry().len(), 100);
        crate::test_utils::assert_single_cycle(engine.registry());
    }
}
