//! Media synchronization planning.
//!
//! Each tick the engine computes, per audible clip, the playback state its
//! media element should be in, and hands the whole plan to a platform
//! adapter. Seeks are gated on a drift tolerance so a healthy player is
//! never seek-thrashed.

use std::collections::HashMap;

use flowcut_core::SYNC_TOLERANCE;
use flowcut_timeline::EditorSession;
use uuid::Uuid;

/// Desired state for one clip's media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaCommand {
    /// Corrective seek target in source seconds; `None` when the element
    /// is within tolerance (or should simply pause where it is).
    pub seek: Option<f64>,
    /// Playback rate: engine speed × clip speed.
    pub rate: f64,
    /// Effective volume after clip and track mute flags.
    pub volume: f64,
    /// Whether the element should be playing.
    pub playing: bool,
}

/// The full per-tick plan: one command per audible clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub commands: HashMap<Uuid, MediaCommand>,
}

/// Platform adapter driving real decoders/players.
///
/// The engine never queries a UI tree; everything it needs back from the
/// platform is the current media position, and everything it tells the
/// platform is a [`SyncPlan`].
pub trait MediaAdapter {
    /// Current position of a clip's media element in source seconds, if
    /// the element exists and reports one.
    fn position(&self, clip_id: Uuid) -> Option<f64>;

    /// Apply a computed plan to the underlying players.
    fn apply(&mut self, plan: &SyncPlan);
}

/// Adapter that drives nothing. Used headless and in tests.
#[derive(Debug, Default)]
pub struct NullAdapter;

impl MediaAdapter for NullAdapter {
    fn position(&self, _clip_id: Uuid) -> Option<f64> {
        None
    }

    fn apply(&mut self, _plan: &SyncPlan) {}
}

/// Compute the sync plan for the session's current playhead.
///
/// Active clips (`start <= t < start + duration`) play at their source
/// position when the engine is playing; inactive clips pause. A clip whose
/// reported position is within [`SYNC_TOLERANCE`] of the target is left
/// alone.
pub fn build_sync_plan(
    session: &EditorSession,
    speed: f64,
    playing: bool,
    adapter: &dyn MediaAdapter,
) -> SyncPlan {
    let time = session.current_time();
    let mut plan = SyncPlan::default();

    for clip in session.clips().values() {
        if !clip.is_audible() {
            continue;
        }
        let active = clip.range().contains(time);
        let track_muted = session
            .track(clip.track_id)
            .map(|t| t.muted)
            .unwrap_or(false);

        let command = if active {
            let target = clip.source_position(time);
            let seek = match adapter.position(clip.id) {
                Some(current) if (current - target).abs() <= SYNC_TOLERANCE => None,
                _ => Some(target),
            };
            MediaCommand {
                seek,
                rate: speed * clip.speed,
                volume: if track_muted {
                    0.0
                } else {
                    clip.effective_volume()
                },
                playing,
            }
        } else {
            MediaCommand {
                seek: None,
                rate: speed * clip.speed,
                volume: 0.0,
                playing: false,
            }
        };
        plan.commands.insert(clip.id, command);
    }

    plan
}
