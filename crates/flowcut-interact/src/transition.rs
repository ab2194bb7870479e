//! Transition application: click-to-apply and drop-on-edge.
//!
//! Transitions are a rendering-time concern; applying one never changes
//! the clip's start or duration.

use flowcut_timeline::{ClipPatch, EditorSession, Transition, TransitionKind};
use uuid::Uuid;

use crate::trim::TrimEdge;

/// Apply a transition to a specific clip edge.
pub fn apply_transition(
    session: &mut EditorSession,
    clip_id: Uuid,
    edge: TrimEdge,
    kind: TransitionKind,
    duration: f64,
) {
    if session.clip(clip_id).is_none() {
        return;
    }
    let transition = Transition {
        kind,
        duration: duration.max(0.0),
    };
    let patch = match edge {
        TrimEdge::Left => ClipPatch {
            transition_in: Some(transition),
            ..Default::default()
        },
        TrimEdge::Right => ClipPatch {
            transition_out: Some(transition),
            ..Default::default()
        },
    };
    session.update_clip(clip_id, patch);
}

/// Drop a transition onto a clip at a timeline position; the nearest edge
/// receives it.
pub fn drop_transition(
    session: &mut EditorSession,
    clip_id: Uuid,
    at_time: f64,
    kind: TransitionKind,
    duration: f64,
) {
    let Some(clip) = session.clip(clip_id) else {
        return;
    };
    let edge = if (at_time - clip.start_time).abs() <= (clip.end_time() - at_time).abs() {
        TrimEdge::Left
    } else {
        TrimEdge::Right
    };
    apply_transition(session, clip_id, edge, kind, duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcut_timeline::{ClipContent, ClipDraft, ClipSource, TrackKind};

    fn setup() -> (EditorSession, Uuid) {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Video, None);
        let clip = session
            .add_clip(
                ClipDraft::new(
                    track,
                    "clip",
                    ClipContent::Video,
                    ClipSource::new("a.mp4", 10.0),
                )
                .at(5.0),
            )
            .unwrap();
        (session, clip)
    }

    #[test]
    fn test_apply_does_not_move_clip() {
        let (mut session, clip) = setup();
        apply_transition(
            &mut session,
            clip,
            TrimEdge::Left,
            TransitionKind::Crossfade,
            0.5,
        );

        let c = session.clip(clip).unwrap();
        assert_eq!(c.transition_in.kind, TransitionKind::Crossfade);
        assert_eq!(c.transition_in.duration, 0.5);
        assert_eq!(c.start_time, 5.0);
        assert_eq!(c.duration, 10.0);
    }

    #[test]
    fn test_drop_picks_nearest_edge() {
        let (mut session, clip) = setup();

        // Clip spans 5..15; a drop at 6 lands on the in edge.
        drop_transition(&mut session, clip, 6.0, TransitionKind::WipeLeft, 0.3);
        let c = session.clip(clip).unwrap();
        assert_eq!(c.transition_in.kind, TransitionKind::WipeLeft);
        assert_eq!(c.transition_out.kind, TransitionKind::None);

        // A drop at 14 lands on the out edge.
        drop_transition(&mut session, clip, 14.0, TransitionKind::Dissolve, 0.3);
        let c = session.clip(clip).unwrap();
        assert_eq!(c.transition_out.kind, TransitionKind::Dissolve);
    }
}
