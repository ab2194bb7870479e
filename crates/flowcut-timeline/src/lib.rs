//! Flowcut Timeline - Timeline data model and editing session
//!
//! Implements the non-destructive multi-track timeline:
//! - Projects, tracks, and clips (with type-specific payloads)
//! - The editing session owning all mutation operations
//! - Snapshot-based undo/redo with debounced commits
//! - Versioned project serialization

pub mod clip;
pub mod history;
pub mod project;
pub mod serialization;
pub mod store;
pub mod track;

pub use clip::{
    AiProvenance, CaptionContent, CaptionSegment, Clip, ClipContent, ClipDraft, ClipKind,
    ClipSource, TextContent, TextStyle, Transform, Transition, TransitionKind,
};
pub use history::History;
pub use project::{AspectPreset, CaptionSettings, Project};
pub use serialization::{ProjectFile, SessionDocument};
pub use store::{ClipPatch, EditorSession, TrackPatch};
pub use track::{Track, TrackKind};
