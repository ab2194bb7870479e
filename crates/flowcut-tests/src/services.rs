//! Integration tests for the service boundary: probe-backed adds,
//! generation results landing as clips, and the export handoff.

use flowcut_core::DEFAULT_SOURCE_DURATION;
use flowcut_services::{
    place_generated_clip, place_generated_clip_shared, probe_or_default, ExportCancel, ExportEvent,
    ExportRequest, ExportService, ExportSettings, FixedProber, GeneratedAsset, MockExportService,
    SharedSession,
};
use flowcut_timeline::{
    CaptionContent, CaptionSegment, ClipContent, ClipDraft, ClipSource, EditorSession, TrackKind,
};

#[test]
fn probe_failure_still_places_clip_with_default_duration() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, None);
    let prober = FixedProber::new(); // knows nothing

    let duration = probe_or_default(&prober, "media/unreachable.mp4");
    let id = session
        .add_clip(ClipDraft::new(
            track,
            "unreachable",
            ClipContent::Video,
            ClipSource::new("media/unreachable.mp4", duration),
        ))
        .unwrap();

    assert_eq!(
        session.clip(id).unwrap().duration,
        DEFAULT_SOURCE_DURATION
    );
}

#[test]
fn generation_result_lands_as_tagged_clip() {
    let mut session = EditorSession::default();
    let video = session.add_track(TrackKind::Video, None);

    let id = place_generated_clip(
        &mut session,
        video,
        GeneratedAsset {
            url: "generated/scene-1.mp4".into(),
            duration: 6.0,
            content: ClipContent::Video,
            name: "Scene 1".into(),
            provider: "kling".into(),
            prompt: "Aerial shot of a coastline at dawn".into(),
        },
    )
    .unwrap();

    let clip = session.clip(id).unwrap();
    assert_eq!(clip.provenance.as_ref().unwrap().provider, "kling");
    assert_eq!(clip.duration, 6.0);
    assert_eq!(session.timeline_duration(), 6.0);
}

#[test]
fn caption_generation_links_to_audio_clip() {
    let mut session = EditorSession::default();
    let audio = session.add_track(TrackKind::Audio, None);
    let captions = session.add_track(TrackKind::Caption, None);

    let vo = session
        .add_clip(ClipDraft::new(
            audio,
            "vo",
            ClipContent::Voiceover,
            ClipSource::new("generated/vo.mp3", 6.0),
        ))
        .unwrap();

    let id = place_generated_clip(
        &mut session,
        captions,
        GeneratedAsset {
            url: "generated/captions.json".into(),
            duration: 6.0,
            content: ClipContent::Caption(CaptionContent {
                segments: vec![CaptionSegment {
                    start: 0.0,
                    end: 6.0,
                    text: "welcome to the show".into(),
                }],
                audio_clip_id: Some(vo),
            }),
            name: "Captions".into(),
            provider: "whisper".into(),
            prompt: String::new(),
        },
    )
    .unwrap();

    match &session.clip(id).unwrap().content {
        ClipContent::Caption(c) => assert_eq!(c.audio_clip_id, Some(vo)),
        other => panic!("expected caption payload, got {:?}", other),
    }
}

#[test]
fn off_thread_completion_uses_shared_session() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    let session: SharedSession = Arc::new(Mutex::new(EditorSession::default()));
    let track = session.lock().add_track(TrackKind::Audio, None);

    let handle = {
        let session = session.clone();
        std::thread::spawn(move || {
            place_generated_clip_shared(
                &session,
                track,
                GeneratedAsset {
                    url: "generated/vo.mp3".into(),
                    duration: 4.0,
                    content: ClipContent::Voiceover,
                    name: "VO".into(),
                    provider: "elevenlabs".into(),
                    prompt: "hello".into(),
                },
            )
        })
    };

    let id = handle.join().unwrap().unwrap();
    assert!(session.lock().clip(id).is_some());
}

#[test]
fn export_consumes_graph_and_streams_to_completion() {
    let mut session = EditorSession::default();
    let track = session.add_track(TrackKind::Video, None);
    session
        .add_clip(ClipDraft::new(
            track,
            "clip",
            ClipContent::Video,
            ClipSource::new("media/a.mp4", 30.0),
        ))
        .unwrap();

    let request = ExportRequest::from_session(&session, ExportSettings::youtube_hd());
    assert_eq!(request.timeline_duration(), 30.0);

    let events: Vec<ExportEvent> = MockExportService
        .submit(request, &ExportCancel::new())
        .iter()
        .collect();

    // Monotonic progress, then exactly one terminal event.
    let progress: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            ExportEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    let terminals = events
        .iter()
        .filter(|e| matches!(e, ExportEvent::Completed(_) | ExportEvent::Failed(_)))
        .count();
    assert_eq!(terminals, 1);

    match events.last().unwrap() {
        ExportEvent::Completed(result) => {
            assert_eq!(result.duration, 30.0);
            assert!(result.file_size > 0);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[test]
fn export_failure_leaves_session_untouched() {
    let session = EditorSession::default(); // empty timeline fails
    let before = session.to_document();

    let request = ExportRequest::from_session(&session, ExportSettings::draft_preview());
    let events: Vec<ExportEvent> = MockExportService
        .submit(request, &ExportCancel::new())
        .iter()
        .collect();

    assert!(matches!(events.last(), Some(ExportEvent::Failed(_))));
    assert_eq!(session.to_document(), before);
}
