//! Media duration probing.
//!
//! Adding a clip needs the source's duration before the clip can span it.
//! The probe is an external service (ffprobe, a HEAD request, a metadata
//! cache); the engine only depends on this trait and a safe fallback.

use std::collections::HashMap;

use flowcut_core::{FlowcutError, Result, DEFAULT_SOURCE_DURATION};
use tracing::warn;

/// Source of media durations.
pub trait MediaProber {
    /// Duration of the media at `url`, in seconds.
    fn probe(&self, url: &str) -> Result<f64>;
}

/// Probe a source, falling back to [`DEFAULT_SOURCE_DURATION`] on failure
/// so the add-clip path never fails on a probe error.
pub fn probe_or_default(prober: &dyn MediaProber, url: &str) -> f64 {
    match prober.probe(url) {
        Ok(duration) if duration > 0.0 => duration,
        Ok(duration) => {
            warn!(url, duration, "probe returned non-positive duration, using default");
            DEFAULT_SOURCE_DURATION
        }
        Err(err) => {
            warn!(url, error = %err, "probe failed, using default duration");
            DEFAULT_SOURCE_DURATION
        }
    }
}

/// Prober backed by a fixed table. Used in tests and the headless driver.
#[derive(Debug, Default)]
pub struct FixedProber {
    durations: HashMap<String, f64>,
}

impl FixedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, duration: f64) -> Self {
        self.durations.insert(url.into(), duration);
        self
    }
}

impl MediaProber for FixedProber {
    fn probe(&self, url: &str) -> Result<f64> {
        self.durations
            .get(url)
            .copied()
            .ok_or_else(|| FlowcutError::Media(format!("no duration known for {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_known_source() {
        let prober = FixedProber::new().with("media/a.mp4", 12.5);
        assert_eq!(probe_or_default(&prober, "media/a.mp4"), 12.5);
    }

    #[test]
    fn test_probe_failure_falls_back() {
        let prober = FixedProber::new();
        assert_eq!(
            probe_or_default(&prober, "media/missing.mp4"),
            DEFAULT_SOURCE_DURATION
        );
    }

    #[test]
    fn test_non_positive_duration_falls_back() {
        let prober = FixedProber::new().with("media/zero.mp4", 0.0);
        assert_eq!(
            probe_or_default(&prober, "media/zero.mp4"),
            DEFAULT_SOURCE_DURATION
        );
    }
}
