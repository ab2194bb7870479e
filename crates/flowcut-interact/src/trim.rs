//! Edge-drag trimming and extension.
//!
//! Fixed-source clips (video/audio/voiceover) expose a window into their
//! source: dragging an edge adjusts trim together with position/duration,
//! and the window can never grow past the material that was trimmed away.
//! Sourceless clips (image/text/caption) have no window; their edges move
//! freely, bounded only by the minimum duration.

use flowcut_core::MIN_CLIP_DURATION;
use flowcut_timeline::{ClipPatch, EditorSession};
use uuid::Uuid;

/// Which edge of a clip is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// State of an in-flight trim gesture. Captures the clip's geometry at
/// grab time; every update is computed from these origins, so pointer
/// jitter cannot accumulate error.
#[derive(Debug, Clone)]
pub struct TrimState {
    pub clip_id: Uuid,
    pub edge: TrimEdge,
    origin_start: f64,
    origin_duration: f64,
    origin_trim_start: f64,
    origin_trim_end: f64,
    fixed_source: bool,
}

impl TrimState {
    /// Begin trimming an edge. Returns `None` for an unknown clip or one
    /// on a locked track.
    pub fn begin(session: &EditorSession, clip_id: Uuid, edge: TrimEdge) -> Option<Self> {
        let clip = session.clip(clip_id)?;
        let track = session.track(clip.track_id)?;
        if track.locked {
            return None;
        }
        Some(Self {
            clip_id,
            edge,
            origin_start: clip.start_time,
            origin_duration: clip.duration,
            origin_trim_start: clip.trim_start,
            origin_trim_end: clip.trim_end,
            fixed_source: clip.has_fixed_source(),
        })
    }

    /// Timeline end of the clip at grab time.
    fn origin_end(&self) -> f64 {
        self.origin_start + self.origin_duration
    }

    /// Apply one pointer move; `target_time` is the (possibly snapped)
    /// timeline position of the dragged edge.
    pub fn update(&self, session: &mut EditorSession, target_time: f64) {
        if session.clip(self.clip_id).is_none() {
            return;
        }
        let patch = match (self.edge, self.fixed_source) {
            (TrimEdge::Left, true) => self.trim_left(target_time),
            (TrimEdge::Right, true) => self.trim_right(target_time),
            (TrimEdge::Left, false) => self.extend_left(target_time),
            (TrimEdge::Right, false) => self.extend_right(target_time),
        };
        session.update_clip(self.clip_id, patch);
    }

    /// Release the pointer, landing the gesture's history commit.
    pub fn finish(self, session: &mut EditorSession) {
        session.flush_pending_commit();
    }

    fn trim_left(&self, target: f64) -> ClipPatch {
        // The head can move left only while trimmed material remains, and
        // right only while the minimum duration survives.
        let min_start = (self.origin_start - self.origin_trim_start).max(0.0);
        let max_start = self.origin_end() - MIN_CLIP_DURATION;
        let new_start = target.clamp(min_start, max_start);
        let delta = new_start - self.origin_start;
        ClipPatch {
            start_time: Some(new_start),
            duration: Some(self.origin_duration - delta),
            trim_start: Some(self.origin_trim_start + delta),
            ..Default::default()
        }
    }

    fn trim_right(&self, target: f64) -> ClipPatch {
        let min_end = self.origin_start + MIN_CLIP_DURATION;
        let max_end = self.origin_end() + self.origin_trim_end;
        let new_end = target.clamp(min_end, max_end);
        let delta = new_end - self.origin_end();
        ClipPatch {
            duration: Some(self.origin_duration + delta),
            trim_end: Some(self.origin_trim_end - delta),
            ..Default::default()
        }
    }

    fn extend_left(&self, target: f64) -> ClipPatch {
        let max_start = self.origin_end() - MIN_CLIP_DURATION;
        let new_start = target.clamp(0.0, max_start);
        ClipPatch {
            start_time: Some(new_start),
            duration: Some(self.origin_end() - new_start),
            ..Default::default()
        }
    }

    fn extend_right(&self, target: f64) -> ClipPatch {
        let new_end = target.max(self.origin_start + MIN_CLIP_DURATION);
        ClipPatch {
            duration: Some(new_end - self.origin_start),
            ..Default::default()
        }
    }
}

/// Split the first selected clip whose span strictly contains the
/// playhead. Returns the two halves' ids, or `None` when the playhead is
/// outside every selected clip.
pub fn split_selected_at_playhead(session: &mut EditorSession) -> Option<[Uuid; 2]> {
    let at = session.current_time();
    let target = session
        .selection()
        .iter()
        .copied()
        .find(|id| {
            session
                .clip(*id)
                .is_some_and(|c| c.start_time < at && at < c.end_time())
        })?;
    session.split_clip(target, at)
}
