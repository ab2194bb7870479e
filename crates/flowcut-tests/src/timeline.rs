//! Integration tests for the timeline session: placement, splitting,
//! history, and persistence round-trips.

use flowcut_timeline::{
    ClipContent, ClipDraft, ClipSource, EditorSession, Project, ProjectFile, TrackKind,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn video_draft(track: Uuid, secs: f64) -> ClipDraft {
    ClipDraft::new(
        track,
        "clip",
        ClipContent::Video,
        ClipSource::new("media/test.mp4", secs),
    )
}

fn build_session() -> (EditorSession, Uuid, Uuid) {
    let mut session = EditorSession::new(Project::new("Integration", 1920, 1080));
    let video = session.add_track(TrackKind::Video, None);
    let audio = session.add_track(TrackKind::Audio, None);
    (session, video, audio)
}

// ── Placement ──────────────────────────────────────────────────

#[test]
fn first_clip_lands_at_zero_second_appends() {
    let (mut session, video, _) = build_session();

    let first = session.add_clip(video_draft(video, 10.0)).unwrap();
    assert_eq!(session.clip(first).unwrap().start_time, 0.0);

    let second = session.add_clip(video_draft(video, 10.0)).unwrap();
    assert_eq!(session.clip(second).unwrap().start_time, 10.0);
    assert_eq!(session.timeline_duration(), 20.0);
}

#[test]
fn duration_is_max_across_tracks() {
    let (mut session, video, audio) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();
    session
        .add_clip(ClipDraft::new(
            audio,
            "bed",
            ClipContent::Audio,
            ClipSource::new("media/bed.mp3", 45.0),
        ))
        .unwrap();

    assert_eq!(session.timeline_duration(), 45.0);
}

#[test]
fn same_track_overlap_is_permitted() {
    // Nothing collision-checks placements: an explicit start inside an
    // occupied span is kept as-is.
    let (mut session, video, _) = build_session();
    let a = session.add_clip(video_draft(video, 10.0)).unwrap();
    let b = session.add_clip(video_draft(video, 10.0).at(5.0)).unwrap();

    let a = session.clip(a).unwrap();
    let b = session.clip(b).unwrap();
    assert!(a.range().overlaps(b.range()));
    assert_eq!(session.timeline_duration(), 15.0);

    // Moving into an overlap is also kept.
    let b_id = b.id;
    session.move_clip(b_id, video, 2.0);
    assert_eq!(session.clip(b_id).unwrap().start_time, 2.0);
}

// ── Split ──────────────────────────────────────────────────────

#[test]
fn split_produces_complementary_halves() {
    let (mut session, video, _) = build_session();
    let id = session.add_clip(video_draft(video, 10.0)).unwrap();

    let [left_id, right_id] = session.split_clip(id, 5.0).unwrap();
    assert_eq!(left_id, id);

    let left = session.clip(left_id).unwrap().clone();
    let right = session.clip(right_id).unwrap().clone();
    assert_eq!((left.duration, left.trim_end), (5.0, 5.0));
    assert_eq!(
        (right.start_time, right.duration, right.trim_start),
        (5.0, 5.0, 5.0)
    );
    assert_eq!(left.duration + right.duration, 10.0);
    assert_eq!(session.timeline_duration(), 10.0);
}

#[test]
fn split_then_split_again_preserves_source_window() {
    let (mut session, video, _) = build_session();
    let id = session.add_clip(video_draft(video, 12.0)).unwrap();

    let [_, right] = session.split_clip(id, 4.0).unwrap();
    let [mid, tail] = session.split_clip(right, 8.0).unwrap();

    let head = session.clip(id).unwrap();
    let mid = session.clip(mid).unwrap();
    let tail = session.clip(tail).unwrap();

    // The three windows tile the original source exactly.
    assert_eq!(head.trim_start, 0.0);
    assert_eq!(mid.trim_start, head.trim_start + head.duration);
    assert_eq!(tail.trim_start, mid.trim_start + mid.duration);
    assert_eq!(head.duration + mid.duration + tail.duration, 12.0);
}

// ── Move ───────────────────────────────────────────────────────

#[test]
fn move_clamps_negative_start_to_zero() {
    let (mut session, video, _) = build_session();
    let id = session.add_clip(video_draft(video, 10.0)).unwrap();

    session.move_clip(id, video, -3.0);
    assert_eq!(session.clip(id).unwrap().start_time, 0.0);
}

#[test]
fn cross_track_move_keeps_lists_consistent() {
    let (mut session, video, audio) = build_session();
    let id = session.add_clip(video_draft(video, 10.0)).unwrap();

    session.move_clip(id, audio, 7.0);

    assert!(!session.track(video).unwrap().contains(id));
    assert!(session.track(audio).unwrap().contains(id));
    assert_eq!(session.clip(id).unwrap().track_id, audio);
}

// ── History ────────────────────────────────────────────────────

#[test]
fn undo_undo_redo_redo_restores_exact_state() {
    let (mut session, video, _) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();
    session.add_clip(video_draft(video, 10.0)).unwrap();

    let after_adds = serde_json::to_value(session.to_document()).unwrap();

    assert!(session.undo());
    assert_eq!(session.clips().len(), 1);
    assert!(session.undo());
    assert!(session.clips().is_empty());
    assert_eq!(session.timeline_duration(), 0.0);

    assert!(session.redo());
    assert!(session.redo());

    // Byte-identical: same ids, same fields.
    let restored = serde_json::to_value(session.to_document()).unwrap();
    assert_eq!(restored, after_adds);
}

#[test]
fn undo_past_beginning_is_noop() {
    let (mut session, video, _) = build_session();

    // Drain every available undo step (track adds), then keep going.
    while session.undo() {}
    assert!(!session.undo());
    assert!(!session.undo());
    assert_eq!(session.tracks().len(), 0); // rolled back to the empty session

    // The rolled-back track id no longer resolves, so the add is a no-op.
    assert!(session.add_clip(video_draft(video, 5.0)).is_none());
}

#[test]
fn removing_track_is_one_undo_step() {
    let (mut session, video, _) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();
    session.add_clip(video_draft(video, 5.0)).unwrap();

    session.remove_track(video);
    assert!(session.clips().is_empty());

    assert!(session.undo());
    assert_eq!(session.clips().len(), 2);
    assert!(session.track(video).is_some());
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn hydrate_serialize_round_trip() {
    let (mut session, video, audio) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();
    session
        .add_clip(
            ClipDraft::new(
                audio,
                "vo",
                ClipContent::Voiceover,
                ClipSource::new("generated/vo.mp3", 8.0),
            )
            .generated_by("elevenlabs", "intro narration"),
        )
        .unwrap();

    let document = session.to_document();

    let mut fresh = EditorSession::default();
    fresh.hydrate(document.clone());

    assert_eq!(fresh.to_document(), document);
    assert_eq!(fresh.timeline_duration(), session.timeline_duration());
    assert!(!fresh.is_dirty());
}

#[test]
fn project_file_round_trip_through_json() {
    let (mut session, video, _) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();

    let file = ProjectFile::new(session.to_document());
    let bytes = file.to_json().unwrap();
    let loaded = ProjectFile::from_json(&bytes).unwrap();

    assert_eq!(loaded.document, session.to_document());
}

#[test]
fn refresh_duration_is_idempotent() {
    let (mut session, video, _) = build_session();
    session.add_clip(video_draft(video, 10.0)).unwrap();

    session.refresh_duration();
    let once = session.timeline_duration();
    session.refresh_duration();
    assert_eq!(once, session.timeline_duration());
}

// ── Referential invariants ─────────────────────────────────────

#[test]
fn track_lists_match_clip_track_ids_after_mixed_edits() {
    let (mut session, video, audio) = build_session();
    let a = session.add_clip(video_draft(video, 10.0)).unwrap();
    let b = session.add_clip(video_draft(video, 6.0)).unwrap();
    session.split_clip(a, 4.0);
    session.move_clip(b, audio, 1.0);
    session.duplicate_clip(b);
    session.remove_clip(a);

    for clip in session.clips().values() {
        let track = session.track(clip.track_id).expect("track exists");
        assert!(track.contains(clip.id));
    }
    for track in session.tracks() {
        for id in &track.clip_ids {
            assert_eq!(session.clip(*id).unwrap().track_id, track.id);
        }
    }
}
