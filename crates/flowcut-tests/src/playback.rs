//! Integration tests for playback: clock advance, end-of-timeline
//! behavior, and media sync across the session boundary.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use flowcut_playback::{MediaAdapter, PlaybackEngine, PlaybackState, SyncPlan};
use flowcut_timeline::{ClipContent, ClipDraft, ClipPatch, ClipSource, EditorSession, TrackKind};
use uuid::Uuid;

/// Adapter with settable positions that records applied plans.
#[derive(Default)]
struct Recorder {
    positions: HashMap<Uuid, f64>,
    plans: Vec<SyncPlan>,
}

impl MediaAdapter for Recorder {
    fn position(&self, clip_id: Uuid) -> Option<f64> {
        self.positions.get(&clip_id).copied()
    }
    fn apply(&mut self, plan: &SyncPlan) {
        self.plans.push(plan.clone());
    }
}

fn session_with_two_clips() -> (EditorSession, Uuid, Uuid) {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, None);
    let first = session
        .add_clip(ClipDraft::new(
            track,
            "first",
            ClipContent::Video,
            ClipSource::new("a.mp4", 10.0),
        ))
        .unwrap();
    let second = session
        .add_clip(ClipDraft::new(
            track,
            "second",
            ClipContent::Video,
            ClipSource::new("b.mp4", 10.0),
        ))
        .unwrap();
    (session, first, second)
}

#[test]
fn playhead_never_overshoots_timeline_end() {
    let (mut session, _, _) = session_with_two_clips();
    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();

    engine.play(&mut session, &mut adapter);
    session.set_current_time(19.95);

    let t0 = Instant::now();
    engine.tick(&mut session, &mut adapter, t0);
    // ~0.1s of wall clock at speed 1.
    engine.tick(&mut session, &mut adapter, t0 + Duration::from_millis(100));

    assert_eq!(session.current_time(), 20.0);
    assert_eq!(engine.state(), PlaybackState::Paused);

    // Large frame gaps clamp the same way.
    engine.play(&mut session, &mut adapter);
    assert_eq!(session.current_time(), 0.0);
    let t1 = Instant::now();
    engine.tick(&mut session, &mut adapter, t1);
    engine.tick(&mut session, &mut adapter, t1 + Duration::from_secs(60));
    assert_eq!(session.current_time(), 20.0);
    assert_eq!(engine.state(), PlaybackState::Paused);
}

#[test]
fn crossing_a_cut_switches_active_clip() {
    let (mut session, first, second) = session_with_two_clips();
    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();

    engine.play(&mut session, &mut adapter);
    session.set_current_time(9.5);

    let t0 = Instant::now();
    engine.tick(&mut session, &mut adapter, t0);
    engine.tick(&mut session, &mut adapter, t0 + Duration::from_secs(1));

    // Now at 10.5: the first clip is past its end, the second is active.
    let plan = adapter.plans.last().unwrap();
    assert!(!plan.commands[&first].playing);
    assert!(plan.commands[&second].playing);
    let target = plan.commands[&second].seek.unwrap();
    assert!((target - 0.5).abs() < 1e-9);
}

#[test]
fn healthy_players_are_not_seek_thrashed() {
    let (mut session, first, _) = session_with_two_clips();
    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();

    engine.play(&mut session, &mut adapter);
    session.set_current_time(4.0);

    // Player is 40ms off target: within tolerance.
    adapter.positions.insert(first, 4.04);
    let t0 = Instant::now();
    engine.tick(&mut session, &mut adapter, t0);
    engine.tick(&mut session, &mut adapter, t0 + Duration::from_millis(16));

    let plan = adapter.plans.last().unwrap();
    assert_eq!(plan.commands[&first].seek, None);
    assert!(plan.commands[&first].playing);
}

#[test]
fn trimmed_clip_seeks_into_source() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, None);
    let clip = session
        .add_clip(
            ClipDraft::new(
                track,
                "trimmed",
                ClipContent::Video,
                ClipSource::new("a.mp4", 30.0),
            )
            .lasting(10.0),
        )
        .unwrap();
    session.update_clip(
        clip,
        ClipPatch {
            trim_start: Some(12.0),
            ..Default::default()
        },
    );

    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();
    engine.seek(&mut session, &mut adapter, 3.0);

    let plan = adapter.plans.last().unwrap();
    // Source position = trim_start + elapsed = 12 + 3.
    assert_eq!(plan.commands[&clip].seek, Some(15.0));
}

#[test]
fn pause_and_stop_sync_once() {
    let (mut session, _, _) = session_with_two_clips();
    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();

    engine.play(&mut session, &mut adapter);
    let after_play = adapter.plans.len();
    assert!(after_play > 0);

    engine.pause(&session, &mut adapter);
    assert_eq!(adapter.plans.len(), after_play + 1);
    assert!(adapter
        .plans
        .last()
        .unwrap()
        .commands
        .values()
        .all(|c| !c.playing));

    engine.stop(&mut session, &mut adapter);
    assert_eq!(session.current_time(), 0.0);
    assert_eq!(adapter.plans.len(), after_play + 2);
}

#[test]
fn editing_while_paused_then_playing_resyncs() {
    let (mut session, first, _) = session_with_two_clips();
    let mut engine = PlaybackEngine::new();
    let mut adapter = Recorder::default();

    engine.seek(&mut session, &mut adapter, 2.0);
    session.update_clip(
        first,
        ClipPatch {
            muted: Some(true),
            ..Default::default()
        },
    );

    engine.play(&mut session, &mut adapter);
    let plan = adapter.plans.last().unwrap();
    assert_eq!(plan.commands[&first].volume, 0.0);
}
