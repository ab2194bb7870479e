//! Integration tests for the interaction layer: drag/snap gestures,
//! trims, transitions, and the keyboard surface driving a session.

use flowcut_interact::{
    dispatch, drop_transition, resolve, DispatchResult, DragState, EditorCommand, KeyPress,
    Modifiers, SnapEngine, TrimEdge, TrimState,
};
use flowcut_timeline::{
    ClipContent, ClipDraft, ClipSource, EditorSession, TrackKind, TransitionKind,
};
use uuid::Uuid;

fn video_session() -> (EditorSession, Uuid) {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, None);
    (session, track)
}

fn add_video(session: &mut EditorSession, track: Uuid, name: &str, secs: f64, at: f64) -> Uuid {
    session
        .add_clip(
            ClipDraft::new(
                track,
                name,
                ClipContent::Video,
                ClipSource::new(format!("media/{name}.mp4"), secs),
            )
            .at(at),
        )
        .unwrap()
}

// ── Drag + snap ────────────────────────────────────────────────

#[test]
fn drag_snaps_to_neighbor_end() {
    let (mut session, track) = video_session();
    add_video(&mut session, track, "neighbor", 8.0, 0.0);
    let dragged = add_video(&mut session, track, "dragged", 4.0, 20.0);
    session.set_zoom(100.0); // 8px threshold → 0.08s

    let snap = SnapEngine::new();
    let grab = session.clip(dragged).unwrap().start_time;
    let mut drag = DragState::begin(&session, dragged, grab).unwrap();

    // Raw computed start lands 0.05s from the neighbor's end at t=8.
    drag.update(&mut session, &snap, 8.05, track);
    drag.finish(&mut session);

    assert_eq!(session.clip(dragged).unwrap().start_time, 8.0);
}

#[test]
fn drag_beyond_threshold_keeps_raw_position() {
    let (mut session, track) = video_session();
    add_video(&mut session, track, "neighbor", 8.0, 0.0);
    let dragged = add_video(&mut session, track, "dragged", 4.0, 20.0);
    session.set_zoom(100.0);

    let snap = SnapEngine::new();
    let grab = session.clip(dragged).unwrap().start_time;
    let mut drag = DragState::begin(&session, dragged, grab).unwrap();

    drag.update(&mut session, &snap, 8.5, track);
    drag.finish(&mut session);

    assert_eq!(session.clip(dragged).unwrap().start_time, 8.5);
}

#[test]
fn cross_track_drag_lands_on_release() {
    let (mut session, track_a) = video_session();
    let track_b = session.add_track(TrackKind::Video, None);
    let clip = add_video(&mut session, track_a, "mover", 6.0, 3.0);

    let snap = SnapEngine::new();
    let mut drag = DragState::begin(&session, clip, 3.0).unwrap();
    drag.update(&mut session, &snap, 12.0, track_b);
    assert_eq!(session.clip(clip).unwrap().track_id, track_a);

    drag.finish(&mut session);
    let moved = session.clip(clip).unwrap();
    assert_eq!(moved.track_id, track_b);
    assert_eq!(moved.start_time, 12.0);
}

// ── Trim + snap together ───────────────────────────────────────

#[test]
fn snapped_trim_closes_gap_exactly() {
    let (mut session, track) = video_session();
    add_video(&mut session, track, "left", 8.0, 0.0);
    let right = add_video(&mut session, track, "right", 12.0, 8.3);
    session.update_clip(
        right,
        flowcut_timeline::ClipPatch {
            duration: Some(9.0),
            trim_start: Some(0.3),
            trim_end: Some(2.7),
            ..Default::default()
        },
    );
    session.set_zoom(100.0);

    // Trim the right clip's head toward the left clip's end; snap the
    // edge onto t=8 before applying.
    let snap = SnapEngine::new();
    let points = SnapEngine::collect_candidates(&session, right);
    let target = snap.find_snap(8.05, &points, session.zoom()).unwrap();

    let trim = TrimState::begin(&session, right, TrimEdge::Left).unwrap();
    trim.update(&mut session, target);
    trim.finish(&mut session);

    let c = session.clip(right).unwrap();
    assert_eq!(c.start_time, 8.0);
    assert!((c.trim_start - 0.0).abs() < 1e-9); // head material exhausted exactly
}

// ── Transitions ────────────────────────────────────────────────

#[test]
fn transition_drop_does_not_reshape_clip() {
    let (mut session, track) = video_session();
    let clip = add_video(&mut session, track, "clip", 10.0, 5.0);

    drop_transition(&mut session, clip, 14.9, TransitionKind::Crossfade, 0.5);

    let c = session.clip(clip).unwrap();
    assert_eq!(c.transition_out.kind, TransitionKind::Crossfade);
    assert_eq!(c.start_time, 5.0);
    assert_eq!(c.duration, 10.0);
    assert_eq!(session.timeline_duration(), 15.0);
}

// ── Keyboard surface ───────────────────────────────────────────

#[test]
fn split_shortcut_respects_playhead_gating() {
    let (mut session, track) = video_session();
    let clip = add_video(&mut session, track, "clip", 10.0, 0.0);
    session.select_clip(clip);

    // Playhead outside the clip: resolve works, dispatch changes nothing.
    session.seek(0.0);
    let cmd = resolve(&KeyPress::new("s", Modifiers::NONE)).unwrap();
    assert_eq!(cmd, EditorCommand::SplitAtPlayhead);
    dispatch(cmd, &mut session);
    assert_eq!(session.clips().len(), 1);

    session.seek(6.0);
    dispatch(cmd, &mut session);
    assert_eq!(session.clips().len(), 2);
}

#[test]
fn undo_redo_shortcuts_drive_history() {
    let (mut session, track) = video_session();
    add_video(&mut session, track, "clip", 10.0, 0.0);

    let undo = resolve(&KeyPress::new("z", Modifiers::PRIMARY)).unwrap();
    let redo = resolve(&KeyPress::new("Z", Modifiers::PRIMARY_SHIFT)).unwrap();

    dispatch(undo, &mut session);
    assert!(session.clips().is_empty());
    dispatch(redo, &mut session);
    assert_eq!(session.clips().len(), 1);
}

#[test]
fn home_end_seek_to_bounds() {
    let (mut session, track) = video_session();
    add_video(&mut session, track, "clip", 10.0, 0.0);
    session.seek(4.0);

    dispatch(
        resolve(&KeyPress::new("End", Modifiers::NONE)).unwrap(),
        &mut session,
    );
    assert_eq!(session.current_time(), 10.0);

    dispatch(
        resolve(&KeyPress::new("Home", Modifiers::NONE)).unwrap(),
        &mut session,
    );
    assert_eq!(session.current_time(), 0.0);
}

#[test]
fn host_level_commands_are_deferred() {
    let mut session = EditorSession::default();
    let toggle = resolve(&KeyPress::new(" ", Modifiers::NONE)).unwrap();
    assert_eq!(
        dispatch(toggle, &mut session),
        DispatchResult::Deferred(EditorCommand::TogglePlayback)
    );
}
