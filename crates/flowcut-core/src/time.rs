//! Time representation for the timeline engine.
//!
//! All timeline positions and durations are seconds as `f64`. Clip edits
//! happen at pointer resolution, so tolerances (not exact equality) govern
//! comparisons; the constants below are the tolerances the whole engine
//! shares.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest duration a clip may have, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Maximum drift between the engine clock and a media element before a
/// corrective seek is issued, in seconds.
pub const SYNC_TOLERANCE: f64 = 0.1;

/// Duration assumed for a source whose probe failed, in seconds.
pub const DEFAULT_SOURCE_DURATION: f64 = 5.0;

/// A half-open time range `[start, start + duration)` on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// Duration of the range in seconds
    pub duration: f64,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: f64, end: f64) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(Self::from_start_end(start, end))
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            format_timecode(self.start),
            format_timecode(self.end())
        )
    }
}

/// Format a time in seconds as `MM:SS.t` (or `H:MM:SS.t` past an hour),
/// the display format used across the editor.
pub fn format_timecode(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total = seconds as u64;
    let tenths = ((seconds - total as f64) * 10.0).round() as u64;
    // 0.96s rounds to "00:01.0", not "00:00.10"
    let (total, tenths) = if tenths >= 10 {
        (total + 1, 0)
    } else {
        (total, tenths)
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}.{}", hours, minutes, secs, tenths)
    } else {
        format!("{:02}:{:02}.{}", minutes, secs, tenths)
    }
}
