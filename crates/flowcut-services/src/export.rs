//! Export service contract.
//!
//! The render pipeline is external: it consumes the full serialized
//! session graph, streams progress, and terminates with a result or a
//! failure. The engine never retries — a failure is surfaced to the
//! caller as-is.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flowcut_timeline::{EditorSession, SessionDocument};

/// Export quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportQuality {
    Draft,
    Standard,
    High,
}

impl ExportQuality {
    /// Rough video bitrate in kbps, used for size estimates.
    pub fn video_bitrate_kbps(self) -> u32 {
        match self {
            Self::Draft => 2_500,
            Self::Standard => 8_000,
            Self::High => 16_000,
        }
    }
}

/// Export render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub quality: ExportQuality,
}

impl ExportSettings {
    /// 1080p landscape at 30 fps.
    pub fn youtube_hd() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
            quality: ExportQuality::Standard,
        }
    }

    /// 1080×1920 vertical at 30 fps.
    pub fn vertical_hd() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30.0,
            quality: ExportQuality::Standard,
        }
    }

    /// Fast low-bitrate preview.
    pub fn draft_preview() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 24.0,
            quality: ExportQuality::Draft,
        }
    }
}

/// Everything the render pipeline needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub document: SessionDocument,
    pub settings: ExportSettings,
}

impl ExportRequest {
    /// Build a request from the session's current state.
    pub fn from_session(session: &EditorSession, settings: ExportSettings) -> Self {
        Self {
            document: session.to_document(),
            settings,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.document.project.name
    }

    /// Duration of the composition being exported.
    pub fn timeline_duration(&self) -> f64 {
        self.document
            .clips
            .values()
            .map(|c| c.start_time + c.duration)
            .fold(0.0, f64::max)
    }
}

/// Terminal result of a successful export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub url: String,
    pub duration: f64,
    pub file_size: u64,
}

/// Events streamed while an export runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// Percent complete, 0–100.
    Progress(u8),
    Completed(ExportResult),
    Failed(String),
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone, Default)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The external render pipeline, seen from the engine.
pub trait ExportService {
    /// Submit a request; events stream on the returned channel, ending
    /// with exactly one `Completed` or `Failed`.
    fn submit(&self, request: ExportRequest, cancel: &ExportCancel) -> Receiver<ExportEvent>;
}

/// In-process stand-in for the render pipeline. Streams synthetic
/// progress and fabricates a result sized from the request. Used by tests
/// and the headless driver.
#[derive(Debug, Default)]
pub struct MockExportService;

impl MockExportService {
    fn run(request: ExportRequest, cancel: ExportCancel, events: Sender<ExportEvent>) {
        let duration = request.timeline_duration();
        if duration <= 0.0 {
            let _ = events.send(ExportEvent::Failed("timeline is empty".into()));
            return;
        }

        for pct in [0u8, 20, 40, 60, 80, 100] {
            if cancel.is_cancelled() {
                let _ = events.send(ExportEvent::Failed("export cancelled".into()));
                return;
            }
            let _ = events.send(ExportEvent::Progress(pct));
        }

        let bitrate = request.settings.quality.video_bitrate_kbps() as u64;
        let file_size = (duration * (bitrate as f64) * 1000.0 / 8.0) as u64;
        let _ = events.send(ExportEvent::Completed(ExportResult {
            url: format!("exports/{}.mp4", slug(request.project_name())),
            duration,
            file_size,
        }));
    }
}

impl ExportService for MockExportService {
    fn submit(&self, request: ExportRequest, cancel: &ExportCancel) -> Receiver<ExportEvent> {
        let (tx, rx) = unbounded();
        let cancel = cancel.clone();
        std::thread::spawn(move || Self::run(request, cancel, tx));
        rx
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        "untitled".into()
    } else {
        slug
    }
}
