//! Snapping engine for timeline interactions.

use flowcut_timeline::EditorSession;
use smallvec::SmallVec;
use uuid::Uuid;

/// A point on the timeline that a dragged edge can lock onto.
#[derive(Debug, Clone, Copy)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    TimelineStart,
    Playhead,
    ClipEdge,
}

/// Candidate set for one gesture. Small timelines dominate, so the
/// collection lives on the stack.
pub type SnapPoints = SmallVec<[SnapPoint; 16]>;

/// Engine for computing snap targets.
#[derive(Debug, Clone)]
pub struct SnapEngine {
    pub enabled: bool,
    /// Snap distance in pixels; divided by zoom to get seconds.
    pub snap_distance_px: f64,
}

impl SnapEngine {
    pub fn new() -> Self {
        Self {
            enabled: true,
            snap_distance_px: 8.0,
        }
    }

    /// Collect all snap candidates: the timeline origin, the playhead,
    /// and both edges of every clip except the one being dragged.
    pub fn collect_candidates(session: &EditorSession, exclude: Uuid) -> SnapPoints {
        let mut points = SnapPoints::new();

        points.push(SnapPoint {
            time: 0.0,
            kind: SnapKind::TimelineStart,
        });
        points.push(SnapPoint {
            time: session.current_time(),
            kind: SnapKind::Playhead,
        });

        for clip in session.clips().values() {
            if clip.id == exclude {
                continue;
            }
            points.push(SnapPoint {
                time: clip.start_time,
                kind: SnapKind::ClipEdge,
            });
            points.push(SnapPoint {
                time: clip.end_time(),
                kind: SnapKind::ClipEdge,
            });
        }

        points
    }

    /// Find the closest candidate within snap distance of `time`.
    /// Returns the snapped time, or `None` if nothing is close enough.
    pub fn find_snap(&self, time: f64, points: &[SnapPoint], zoom: f64) -> Option<f64> {
        if !self.enabled || zoom <= 0.0 {
            return None;
        }

        let threshold = self.snap_distance_px / zoom;
        let mut best: Option<(f64, f64)> = None; // (snap_time, distance)

        for sp in points {
            let dist = (sp.time - time).abs();
            if dist <= threshold && best.map_or(true, |(_, d)| dist < d) {
                best = Some((sp.time, dist));
            }
        }

        best.map(|(t, _)| t)
    }

    /// Snap a dragged clip's position. Tries the start edge first, then
    /// the end edge symmetrically; falls back to the raw position.
    pub fn snap_clip_start(&self, session: &EditorSession, clip_id: Uuid, raw_start: f64) -> f64 {
        if !self.enabled {
            return raw_start;
        }
        let Some(clip) = session.clip(clip_id) else {
            return raw_start;
        };

        let points = Self::collect_candidates(session, clip_id);
        let zoom = session.zoom();

        if let Some(snapped) = self.find_snap(raw_start, &points, zoom) {
            return snapped;
        }
        let raw_end = raw_start + clip.duration;
        if let Some(snapped) = self.find_snap(raw_end, &points, zoom) {
            return snapped - clip.duration;
        }

        raw_start
    }
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcut_timeline::{ClipContent, ClipDraft, ClipSource, EditorSession, TrackKind};

    fn make_points() -> Vec<SnapPoint> {
        vec![
            SnapPoint {
                time: 0.0,
                kind: SnapKind::TimelineStart,
            },
            SnapPoint {
                time: 8.0,
                kind: SnapKind::ClipEdge,
            },
            SnapPoint {
                time: 12.5,
                kind: SnapKind::Playhead,
            },
        ]
    }

    #[test]
    fn test_find_snap_near_point() {
        let engine = SnapEngine::new();
        // 8px at zoom 100 px/s → 0.08s threshold.
        let result = engine.find_snap(8.05, &make_points(), 100.0);
        assert_eq!(result, Some(8.0));
    }

    #[test]
    fn test_find_snap_too_far() {
        let engine = SnapEngine::new();
        let result = engine.find_snap(5.0, &make_points(), 100.0);
        assert!(result.is_none());
    }

    #[test]
    fn test_find_snap_prefers_nearest() {
        let engine = SnapEngine::new();
        // Halve the zoom, double the reach: both 8.0 and 12.5 visible from 10?
        // No — keep it unambiguous: 8.2 is near only 8.0 at zoom 20 (0.4s).
        let result = engine.find_snap(8.2, &make_points(), 20.0);
        assert_eq!(result, Some(8.0));
    }

    #[test]
    fn test_find_snap_disabled() {
        let mut engine = SnapEngine::new();
        engine.enabled = false;
        assert!(engine.find_snap(8.0, &make_points(), 100.0).is_none());
    }

    #[test]
    fn test_snap_clip_excludes_own_edges() {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Video, None);
        let neighbor = session
            .add_clip(ClipDraft::new(
                track,
                "a",
                ClipContent::Video,
                ClipSource::new("a.mp4", 8.0),
            ))
            .unwrap();
        let dragged = session
            .add_clip(ClipDraft::new(
                track,
                "b",
                ClipContent::Video,
                ClipSource::new("b.mp4", 4.0),
            ))
            .unwrap();
        session.set_zoom(100.0);

        let engine = SnapEngine::new();
        // Raw position 0.05s from the neighbor's end at t=8.
        let snapped = engine.snap_clip_start(&session, dragged, 8.05);
        assert_eq!(snapped, 8.0);

        // The dragged clip's own edges are not candidates.
        let points = SnapEngine::collect_candidates(&session, dragged);
        let neighbor_end = session.clip(neighbor).unwrap().end_time();
        assert!(points.iter().any(|p| p.time == neighbor_end));
        let dragged_end = session.clip(dragged).unwrap().end_time();
        assert!(!points
            .iter()
            .any(|p| p.kind == SnapKind::ClipEdge && p.time == dragged_end));
    }

    #[test]
    fn test_snap_clip_end_edge_symmetric() {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Video, None);
        session
            .add_clip(
                ClipDraft::new(
                    track,
                    "a",
                    ClipContent::Video,
                    ClipSource::new("a.mp4", 8.0),
                )
                .at(10.0),
            )
            .unwrap();
        let dragged = session
            .add_clip(
                ClipDraft::new(
                    track,
                    "b",
                    ClipContent::Video,
                    ClipSource::new("b.mp4", 4.0),
                )
                .at(30.0),
            )
            .unwrap();
        session.set_zoom(100.0);

        let engine = SnapEngine::new();
        // Dragged end (raw 5.97 + 4.0 = 9.97) is near the neighbor start at 10.
        let snapped = engine.snap_clip_start(&session, dragged, 5.97);
        assert!((snapped - 6.0).abs() < 1e-9);
    }
}
