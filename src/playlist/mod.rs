//! Smart-shuffle playlist engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PlaylistEngine                           │
//! │   play / advance / rewind / force_next / set_cooldown_window │
//! └──────┬───────────────────┬───────────────────┬───────────────┘
//!        │ walks, relinks    │ records, checks   │ push / pop
//!        ▼                   ▼                   ▼
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//! │ SongRegistry │   │ CooldownWindow │   │ HistoryStack │
//! │ circular     │   │ last K artists │   │ played songs │
//! │ arena list   │   │ + counts       │   │              │
//! └──────────────┘   └────────────────┘   └──────────────┘
//!                            │
//!                            ▼ PlaybackEvent (crossbeam channels)
//!                       subscribers
//! ```
//!
//! Everything is synchronous and in memory. Wrap the engine with
//! [`PlaylistEngine::into_shared`] to use it from more than one thread.

mod cooldown;
mod engine;
mod events;
mod history;
mod registry;
mod song;

pub use cooldown::CooldownWindow;
pub use engine::{PlaylistEngine, SharedEngine};
pub use events::{
    CandidateCheck, EventBus, PlayEvent, PlaybackEvent, SelectionReason, SelectionTrace, Verdict,
};
pub use history::HistoryStack;
pub use registry::{Iter, SongRegistry};
pub use song::{Song, SongHandle};
