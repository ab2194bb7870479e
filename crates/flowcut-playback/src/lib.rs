//! Flowcut Playback - Real-time clock and media synchronization
//!
//! Drives the playhead from wall-clock time while playing and keeps media
//! players aligned to it through a pluggable platform adapter. The core
//! computes desired per-clip playback state; the adapter owns the actual
//! decoders/players.

pub mod engine;
pub mod sync;

pub use engine::{PlaybackEngine, PlaybackState};
pub use sync::{build_sync_plan, MediaAdapter, MediaCommand, NullAdapter, SyncPlan};
