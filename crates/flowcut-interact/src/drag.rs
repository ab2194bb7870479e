//! Clip drag/reposition gesture.
//!
//! Horizontal position updates apply continuously so the preview follows
//! the pointer. Cross-track reassignment is tracked during the gesture but
//! committed only on release — reparenting the dragged clip mid-gesture
//! would remount it under the pointer.

use flowcut_timeline::{ClipPatch, EditorSession};
use tracing::debug;
use uuid::Uuid;

use crate::snap::SnapEngine;

/// State of an in-flight clip drag.
#[derive(Debug, Clone)]
pub struct DragState {
    pub clip_id: Uuid,
    /// Track the clip was on when the gesture began.
    pub origin_track: Uuid,
    /// Seconds between the pointer and the clip's start at grab time.
    pub grab_offset: f64,
    /// Track currently under the pointer; applied on release.
    pub hover_track: Uuid,
    /// Snap target shown as an indicator, if any.
    pub snapped_to: Option<f64>,
}

impl DragState {
    /// Begin dragging a clip grabbed at `pointer_time`. Returns `None`
    /// for an unknown clip or one on a locked track.
    pub fn begin(session: &EditorSession, clip_id: Uuid, pointer_time: f64) -> Option<Self> {
        let clip = session.clip(clip_id)?;
        let track = session.track(clip.track_id)?;
        if track.locked {
            return None;
        }
        Some(Self {
            clip_id,
            origin_track: clip.track_id,
            grab_offset: pointer_time - clip.start_time,
            hover_track: clip.track_id,
            snapped_to: None,
        })
    }

    /// Apply one pointer move. Updates the clip's horizontal position
    /// (snapped) and remembers the hovered track for the release commit.
    pub fn update(
        &mut self,
        session: &mut EditorSession,
        snap: &SnapEngine,
        pointer_time: f64,
        hover_track: Uuid,
    ) {
        if session.clip(self.clip_id).is_none() {
            return;
        }
        if session.track(hover_track).is_some() {
            self.hover_track = hover_track;
        }

        let raw_start = (pointer_time - self.grab_offset).max(0.0);
        let snapped = snap.snap_clip_start(session, self.clip_id, raw_start);
        self.snapped_to = (snapped != raw_start).then_some(snapped);

        session.update_clip(
            self.clip_id,
            ClipPatch {
                start_time: Some(snapped.max(0.0)),
                ..Default::default()
            },
        );
    }

    /// Release the pointer: commit the cross-track move, if any.
    pub fn finish(self, session: &mut EditorSession) {
        let Some(clip) = session.clip(self.clip_id) else {
            return;
        };
        if self.hover_track != clip.track_id {
            let start = clip.start_time;
            session.move_clip(self.clip_id, self.hover_track, start);
            debug!(clip = %self.clip_id, track = %self.hover_track, "drag committed cross-track");
        } else {
            // Same-track drags land through the debounced position commit.
            session.flush_pending_commit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcut_timeline::{ClipContent, ClipDraft, ClipSource, TrackKind};

    fn setup() -> (EditorSession, Uuid, Uuid, Uuid) {
        let mut session = EditorSession::default();
        let track_a = session.add_track(TrackKind::Video, None);
        let track_b = session.add_track(TrackKind::Video, None);
        let clip = session
            .add_clip(
                ClipDraft::new(
                    track_a,
                    "clip",
                    ClipContent::Video,
                    ClipSource::new("a.mp4", 10.0),
                )
                .at(5.0),
            )
            .unwrap();
        session.set_zoom(100.0);
        (session, track_a, track_b, clip)
    }

    #[test]
    fn test_drag_moves_horizontally() {
        let (mut session, _, _, clip) = setup();
        let snap = SnapEngine::new();

        // Grab the middle of the clip (t=10, start=5, offset 5).
        let track = session.clip(clip).unwrap().track_id;
        let mut drag = DragState::begin(&session, clip, 10.0).unwrap();
        drag.update(&mut session, &snap, 16.0, track);
        assert_eq!(session.clip(clip).unwrap().start_time, 11.0);
    }

    #[test]
    fn test_drag_clamps_at_zero() {
        let (mut session, track_a, _, clip) = setup();
        let snap = SnapEngine::new();

        let mut drag = DragState::begin(&session, clip, 5.0).unwrap();
        drag.update(&mut session, &snap, -20.0, track_a);
        assert_eq!(session.clip(clip).unwrap().start_time, 0.0);
    }

    #[test]
    fn test_cross_track_commits_on_release_only() {
        let (mut session, track_a, track_b, clip) = setup();
        let snap = SnapEngine::new();

        let mut drag = DragState::begin(&session, clip, 5.0).unwrap();
        drag.update(&mut session, &snap, 7.0, track_b);

        // Mid-gesture: position follows, track does not.
        assert_eq!(session.clip(clip).unwrap().track_id, track_a);

        drag.finish(&mut session);
        assert_eq!(session.clip(clip).unwrap().track_id, track_b);
        assert!(session.track(track_b).unwrap().contains(clip));
        assert!(!session.track(track_a).unwrap().contains(clip));
    }

    #[test]
    fn test_locked_track_rejects_drag() {
        let (mut session, track_a, _, clip) = setup();
        session.update_track(
            track_a,
            flowcut_timeline::TrackPatch {
                locked: Some(true),
                ..Default::default()
            },
        );
        assert!(DragState::begin(&session, clip, 5.0).is_none());
    }

    #[test]
    fn test_drag_snaps_to_neighbor_edge() {
        let (mut session, track_a, _, clip) = setup();
        session
            .add_clip(
                ClipDraft::new(
                    track_a,
                    "other",
                    ClipContent::Video,
                    ClipSource::new("b.mp4", 8.0),
                )
                .at(20.0),
            )
            .unwrap();
        let snap = SnapEngine::new();

        // Raw landing start would be 28.05; neighbor end at 28 is within
        // the 0.08s threshold at zoom 100.
        let mut drag = DragState::begin(&session, clip, 5.0).unwrap();
        drag.update(&mut session, &snap, 28.05, track_a);
        assert_eq!(session.clip(clip).unwrap().start_time, 28.0);
        assert_eq!(drag.snapped_to, Some(28.0));
    }
}
