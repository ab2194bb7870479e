//! Flowcut Interact - Pointer-driven editing algorithms
//!
//! Direct-manipulation gestures over a timeline session:
//! - Snapping (clip edges, playhead, timeline origin)
//! - Drag/reposition with commit-on-release cross-track moves
//! - Edge trimming (fixed-source clips) and free extension (the rest)
//! - Transition application by click or edge drop
//! - The keyboard command surface
//!
//! Everything here is pure computation against the session; no UI toolkit
//! is involved.

pub mod drag;
pub mod keyboard;
pub mod snap;
pub mod transition;
pub mod trim;

pub use drag::DragState;
pub use keyboard::{dispatch, resolve, DispatchResult, EditorCommand, KeyPress, Modifiers};
pub use snap::{SnapEngine, SnapKind, SnapPoint};
pub use transition::{apply_transition, drop_transition};
pub use trim::{split_selected_at_playhead, TrimEdge, TrimState};
