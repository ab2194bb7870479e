//! Flowcut headless driver.
//!
//! Assembles a small composition, plays it against a logging media
//! adapter, and runs a mock export. Useful for exercising the engine
//! end-to-end without a UI host.

use std::time::{Duration, Instant};

use anyhow::Result;
use flowcut_interact::{DragState, SnapEngine, TrimEdge, TrimState};
use flowcut_playback::{MediaAdapter, PlaybackEngine, SyncPlan};
use flowcut_services::{
    place_generated_clip, probe_or_default, ExportCancel, ExportEvent, ExportRequest,
    ExportService, ExportSettings, FixedProber, GeneratedAsset, MockExportService,
};
use flowcut_timeline::{
    AspectPreset, ClipContent, ClipDraft, ClipSource, EditorSession, Project, ProjectFile,
    TrackKind,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// Adapter that logs each plan instead of driving players.
#[derive(Default)]
struct LoggingAdapter;

impl MediaAdapter for LoggingAdapter {
    fn position(&self, _clip_id: Uuid) -> Option<f64> {
        None
    }

    fn apply(&mut self, plan: &SyncPlan) {
        let playing = plan.commands.values().filter(|c| c.playing).count();
        info!(clips = plan.commands.len(), playing, "sync plan applied");
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Flowcut starting...");

    let mut session = EditorSession::new(Project::with_aspect("Demo Reel", AspectPreset::Widescreen));
    let video_track = session.add_track(TrackKind::Video, None);
    let audio_track = session.add_track(TrackKind::Audio, None);

    // Probe-backed clip placement.
    let prober = FixedProber::new()
        .with("media/intro.mp4", 6.0)
        .with("media/broll.mp4", 9.0);
    for url in ["media/intro.mp4", "media/broll.mp4"] {
        let duration = probe_or_default(&prober, url);
        session.add_clip(ClipDraft::new(
            video_track,
            url.rsplit('/').next().unwrap_or(url),
            ClipContent::Video,
            ClipSource::new(url, duration),
        ));
    }

    // A generated voiceover lands with provenance.
    place_generated_clip(
        &mut session,
        audio_track,
        GeneratedAsset {
            url: "generated/vo.mp3".into(),
            duration: 12.0,
            content: ClipContent::Voiceover,
            name: "Narration".into(),
            provider: "elevenlabs".into(),
            prompt: "Energetic product intro".into(),
        },
    );

    // Trim the intro a touch, then undo/redo to show history.
    let intro = session.clips_on_track(video_track)[0].id;
    if let Some(trim) = TrimState::begin(&session, intro, TrimEdge::Right) {
        trim.update(&mut session, 5.0);
        trim.finish(&mut session);
    }
    session.undo();
    session.redo();

    // Close the gap the trim left: drag the b-roll toward the intro and
    // let its start snap onto the intro's end.
    let broll = session.clips_on_track(video_track)[1].id;
    let grab = session.clip(broll).map(|c| c.start_time).unwrap_or(0.0);
    let snap = SnapEngine::new();
    if let Some(mut drag) = DragState::begin(&session, broll, grab) {
        drag.update(&mut session, &snap, 5.1, video_track);
        drag.finish(&mut session);
    }

    info!(
        duration = session.timeline_duration(),
        tracks = session.tracks().len(),
        clips = session.clips().len(),
        "composition assembled"
    );

    // Play one simulated second.
    let mut playback = PlaybackEngine::new();
    let mut adapter = LoggingAdapter;
    playback.play(&mut session, &mut adapter);
    let start = Instant::now();
    for frame in 0..30u64 {
        let now = start + Duration::from_millis(frame * 33);
        playback.tick(&mut session, &mut adapter, now);
        session.maintain(now);
    }
    playback.pause(&session, &mut adapter);
    info!(at = session.current_time(), "playback paused");

    // Save the project, then export through the mock pipeline.
    let save_path = std::env::temp_dir().join("flowcut-demo.json");
    ProjectFile::new(session.to_document()).save_to_file(&save_path)?;
    session.mark_saved();
    info!(path = %save_path.display(), "project saved");

    let request = ExportRequest::from_session(&session, ExportSettings::youtube_hd());
    let events = MockExportService.submit(request, &ExportCancel::new());
    for event in events.iter() {
        match event {
            ExportEvent::Progress(pct) => info!(pct, "export progress"),
            ExportEvent::Completed(result) => {
                info!(url = %result.url, size = result.file_size, "export complete")
            }
            ExportEvent::Failed(reason) => info!(%reason, "export failed"),
        }
    }

    Ok(())
}
