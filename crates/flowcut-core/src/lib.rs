//! Flowcut Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types used throughout Flowcut:
//! - Error taxonomy (FlowcutError, Result)
//! - Time representation and ranges (seconds-based)
//! - The debounce utility used to coalesce interactive mutations

pub mod debounce;
pub mod error;
pub mod time;

pub use debounce::Debounce;
pub use error::{FlowcutError, Result};
pub use time::{TimeRange, DEFAULT_SOURCE_DURATION, MIN_CLIP_DURATION, SYNC_TOLERANCE};
