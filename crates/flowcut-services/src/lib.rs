//! Flowcut Services - External collaborator contracts
//!
//! The timeline engine treats media probing, AI generation, and export as
//! external services behind narrow interfaces. This crate defines those
//! interfaces plus the glue that turns service results into ordinary
//! session mutations.

pub mod export;
pub mod generate;
pub mod probe;

use flowcut_timeline::EditorSession;
use parking_lot::Mutex;
use std::sync::Arc;

/// A session shared with completion callbacks running off the editing
/// thread. All mutations go through the single lock, preserving the
/// engine's single-writer discipline.
pub type SharedSession = Arc<Mutex<EditorSession>>;

pub use export::{
    ExportCancel, ExportEvent, ExportQuality, ExportRequest, ExportResult, ExportService,
    ExportSettings, MockExportService,
};
pub use generate::{place_generated_clip, place_generated_clip_shared, GeneratedAsset};
pub use probe::{probe_or_default, FixedProber, MediaProber};
