//! Observable results of engine operations.

use crossbeam_channel::{Receiver, Sender, bounded};
use serde::Serialize;
use smallvec::SmallVec;

/// How a song came to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Played in place (PLAY)
    Current,
    /// First cooldown-free candidate
    Natural,
    /// Forced to play next
    Override,
    /// Every candidate was cooling down; took the immediate successor
    Fallback,
}

/// Verdict for one candidate examined by `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    AcceptedOverride,
    SkippedCooldown,
}

/// One step of the selection walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateCheck {
    pub id: String,
    pub artist: String,
    pub verdict: Verdict,
}

/// Candidates examined by a single advance, in walk order.
pub type SelectionTrace = SmallVec<[CandidateCheck; 8]>;

/// Emitted whenever a song is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayEvent {
    pub id: String,
    pub artist: String,
    pub title: String,
    /// Cooldown window after the play, oldest first
    pub window: Vec<String>,
    /// Artist that dropped out of the window, if any
    pub evicted: Option<String>,
    pub reason: SelectionReason,
    /// Candidates examined before this song was chosen (empty for PLAY)
    #[serde(skip_serializing_if = "SmallVec::is_empty")]
    pub trace: SelectionTrace,
}

/// Everything the engine broadcasts to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    Played(PlayEvent),
    Rewound { id: String, artist: String },
    Queued { id: String, artist: String, title: String },
    CooldownChanged { window: usize },
}

/// Fan-out of playback events to any number of receivers.
///
/// Publishing never blocks. Receivers that were dropped, or that fell
/// `SUBSCRIBER_CAPACITY` events behind, are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<PlaybackEvent>>,
}

/// Events a subscriber may leave unread before it is disconnected.
pub const SUBSCRIBER_CAPACITY: usize = 256;

impl EventBus {
    /// A subscriber that stops reading is dropped once its buffer fills.
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: &PlaybackEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.try_send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
