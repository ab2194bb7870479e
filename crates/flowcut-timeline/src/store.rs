//! The editing session: owns the timeline model and every mutation.
//!
//! All tracks and clips are created, mutated, and destroyed through the
//! operations here; nothing else touches the model. Operations validate
//! their inputs and degrade to no-ops (or return `None`) on invalid input —
//! speculative pointer interactions routinely miss, and a miss must never
//! panic the session.
//!
//! Each session owns its own history and debounce state; sessions can
//! coexist (tests, multiple open projects) without cross-contamination.

use std::collections::HashMap;
use std::time::Instant;

use flowcut_core::{Debounce, MIN_CLIP_DURATION};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clip::{Clip, ClipContent, ClipDraft, Transform, Transition};
use crate::history::History;
use crate::project::{CaptionSettings, Project};
use crate::serialization::SessionDocument;
use crate::track::{Track, TrackKind};

/// Quiet period for coalescing interactive mutations into one undo step.
const COMMIT_DEBOUNCE_MS: u64 = 100;

/// Gap left between an original and its duplicate, in seconds.
const DUPLICATE_GAP: f64 = 0.1;

/// Zoom bounds in pixels per second.
pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 400.0;
const DEFAULT_ZOOM: f64 = 50.0;
const ZOOM_STEP: f64 = 1.25;

/// Serialized view of the history-tracked slice. Selection, playhead, and
/// playback flags are excluded on purpose.
#[derive(Serialize)]
struct TimelineSlice<'a> {
    tracks: &'a Vec<Track>,
    clips: &'a HashMap<Uuid, Clip>,
}

/// Partial update for a track.
#[derive(Debug, Clone, Default)]
pub struct TrackPatch {
    pub name: Option<String>,
    pub height: Option<f32>,
    pub muted: Option<bool>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

/// Partial update for a clip. Fields left `None` are untouched.
#[derive(Debug, Clone, Default)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    pub speed: Option<f64>,
    pub opacity: Option<f64>,
    pub transform: Option<Transform>,
    pub transition_in: Option<Transition>,
    pub transition_out: Option<Transition>,
    /// Replacement payload; must keep the clip's kind.
    pub content: Option<ClipContent>,
}

/// A single editing session over one project.
#[derive(Debug)]
pub struct EditorSession {
    project: Project,
    caption_settings: CaptionSettings,
    tracks: Vec<Track>,
    clips: HashMap<Uuid, Clip>,
    selection: Vec<Uuid>,
    current_time: f64,
    zoom: f64,
    timeline_duration: f64,
    dirty: bool,
    history: History,
    commit_debounce: Debounce,
}

impl EditorSession {
    /// Create a session over an empty timeline.
    pub fn new(project: Project) -> Self {
        let mut session = Self {
            project,
            caption_settings: CaptionSettings::default(),
            tracks: Vec::new(),
            clips: HashMap::new(),
            selection: Vec::new(),
            current_time: 0.0,
            zoom: DEFAULT_ZOOM,
            timeline_duration: 0.0,
            dirty: false,
            history: History::default(),
            commit_debounce: Debounce::new(COMMIT_DEBOUNCE_MS),
        };
        // Baseline snapshot so the first edit can be undone back to empty.
        session.push_history_now();
        session
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn caption_settings(&self) -> &CaptionSettings {
        &self.caption_settings
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn clips(&self) -> &HashMap<Uuid, Clip> {
        &self.clips
    }

    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.get(&id)
    }

    pub fn selection(&self) -> &[Uuid] {
        &self.selection
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn timeline_duration(&self) -> f64 {
        self.timeline_duration
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clips on a track, ordered by start time.
    pub fn clips_on_track(&self, track_id: Uuid) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .values()
            .filter(|c| c.track_id == track_id)
            .collect();
        clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        clips
    }

    /// Clips whose span contains the given time.
    pub fn clips_active_at(&self, time: f64) -> Vec<&Clip> {
        self.clips
            .values()
            .filter(|c| c.range().contains(time))
            .collect()
    }

    /// End of the occupied span on a track (0 when empty).
    pub fn track_end(&self, track_id: Uuid) -> f64 {
        self.clips
            .values()
            .filter(|c| c.track_id == track_id)
            .map(|c| c.end_time())
            .fold(0.0, f64::max)
    }

    // ── Project metadata ────────────────────────────────────────

    pub fn rename_project(&mut self, name: impl Into<String>) {
        self.project.name = name.into();
        self.dirty = true;
    }

    pub fn set_caption_settings(&mut self, settings: CaptionSettings) {
        self.caption_settings = settings;
        self.dirty = true;
    }

    // ── Track operations ────────────────────────────────────────

    /// Append a new empty track. Auto-names it `"{Kind} {n}"` when no name
    /// is given.
    pub fn add_track(&mut self, kind: TrackKind, name: Option<String>) -> Uuid {
        let name = name.unwrap_or_else(|| {
            let nth = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
            format!("{} {}", kind.label(), nth)
        });
        let track = Track::new(kind, name);
        let id = track.id;
        self.tracks.push(track);
        self.dirty = true;
        self.commit_history();
        info!(track = %id, kind = %kind, "track added");
        id
    }

    /// Remove a track and every clip on it.
    pub fn remove_track(&mut self, id: Uuid) {
        let Some(index) = self.tracks.iter().position(|t| t.id == id) else {
            return;
        };
        let removed: Vec<Uuid> = self
            .clips
            .values()
            .filter(|c| c.track_id == id)
            .map(|c| c.id)
            .collect();
        for clip_id in &removed {
            self.clips.remove(clip_id);
        }
        self.selection.retain(|sel| !removed.contains(sel));
        self.tracks.remove(index);
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        info!(track = %id, clips = removed.len(), "track removed");
    }

    /// Merge the given fields into a track.
    pub fn update_track(&mut self, id: Uuid, patch: TrackPatch) {
        let Some(track) = self.tracks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if let Some(name) = patch.name {
            track.name = name;
        }
        if let Some(height) = patch.height {
            track.height = height.max(16.0);
        }
        if let Some(muted) = patch.muted {
            track.muted = muted;
        }
        if let Some(locked) = patch.locked {
            track.locked = locked;
        }
        if let Some(visible) = patch.visible {
            track.visible = visible;
        }
        self.dirty = true;
        self.schedule_history_commit();
    }

    /// Reorder tracks. No-op unless `order` is a permutation of the
    /// current track ids.
    pub fn reorder_tracks(&mut self, order: &[Uuid]) {
        if order.len() != self.tracks.len() {
            return;
        }
        let mut reordered = Vec::with_capacity(self.tracks.len());
        for id in order {
            match self.tracks.iter().find(|t| t.id == *id) {
                Some(track) => reordered.push(track.clone()),
                None => return,
            }
        }
        self.tracks = reordered;
        self.dirty = true;
        self.commit_history();
    }

    // ── Clip operations ─────────────────────────────────────────

    /// Place a new clip. A draft at `start_time == 0` targeting a track
    /// that already has clips is appended after the track's occupied span
    /// instead of landing at 0. Returns `None` when the target track does
    /// not exist.
    pub fn add_clip(&mut self, draft: ClipDraft) -> Option<Uuid> {
        if self.track(draft.track_id).is_none() {
            warn!(track = %draft.track_id, "add_clip: unknown track");
            return None;
        }

        let mut start_time = draft.start_time.max(0.0);
        if start_time == 0.0 {
            let end = self.track_end(draft.track_id);
            if end > 0.0 {
                start_time = end;
            }
        }

        let clip = Clip {
            id: Uuid::new_v4(),
            track_id: draft.track_id,
            name: draft.name,
            content: draft.content,
            source: draft.source,
            start_time,
            duration: draft.duration.max(MIN_CLIP_DURATION),
            trim_start: draft.trim_start.max(0.0),
            trim_end: draft.trim_end.max(0.0),
            volume: draft.volume.clamp(0.0, 1.0),
            muted: draft.muted,
            speed: draft.speed.max(0.1),
            opacity: draft.opacity.clamp(0.0, 1.0),
            transform: draft.transform,
            transition_in: draft.transition_in,
            transition_out: draft.transition_out,
            provenance: draft.provenance,
        };
        let id = clip.id;
        let track_id = clip.track_id;

        self.clips.insert(id, clip);
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == track_id) {
            track.push_clip(id);
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        debug!(clip = %id, track = %track_id, start = start_time, "clip added");
        Some(id)
    }

    /// Merge the given fields into a clip, clamping to valid ranges.
    /// Called continuously during drag/trim gestures, so the history
    /// commit is debounced.
    pub fn update_clip(&mut self, id: Uuid, patch: ClipPatch) {
        let Some(clip) = self.clips.get_mut(&id) else {
            return;
        };
        if let Some(name) = patch.name {
            clip.name = name;
        }
        if let Some(start_time) = patch.start_time {
            clip.start_time = start_time.max(0.0);
        }
        if let Some(duration) = patch.duration {
            clip.duration = duration.max(MIN_CLIP_DURATION);
        }
        if let Some(trim_start) = patch.trim_start {
            clip.trim_start = trim_start.max(0.0);
        }
        if let Some(trim_end) = patch.trim_end {
            clip.trim_end = trim_end.max(0.0);
        }
        if let Some(volume) = patch.volume {
            clip.volume = volume.clamp(0.0, 1.0);
        }
        if let Some(muted) = patch.muted {
            clip.muted = muted;
        }
        if let Some(speed) = patch.speed {
            clip.speed = speed.max(0.1);
        }
        if let Some(opacity) = patch.opacity {
            clip.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(transform) = patch.transform {
            clip.transform = Some(transform);
        }
        if let Some(transition_in) = patch.transition_in {
            clip.transition_in = transition_in;
        }
        if let Some(transition_out) = patch.transition_out {
            clip.transition_out = transition_out;
        }
        if let Some(content) = patch.content {
            if content.kind() == clip.kind() {
                clip.content = content;
            } else {
                warn!(clip = %id, "update_clip: payload kind mismatch ignored");
            }
        }
        self.refresh_duration();
        self.dirty = true;
        self.schedule_history_commit();
    }

    /// Remove a clip from the map, its track, and the selection.
    pub fn remove_clip(&mut self, id: Uuid) {
        if !self.remove_clip_inner(id) {
            return;
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        debug!(clip = %id, "clip removed");
    }

    fn remove_clip_inner(&mut self, id: Uuid) -> bool {
        let Some(clip) = self.clips.remove(&id) else {
            return false;
        };
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == clip.track_id) {
            track.remove_clip(id);
        }
        self.selection.retain(|sel| *sel != id);
        true
    }

    /// Move a clip, possibly across tracks. The new start is clamped to
    /// >= 0; the destination list append is idempotent.
    pub fn move_clip(&mut self, id: Uuid, new_track_id: Uuid, new_start: f64) {
        if self.track(new_track_id).is_none() {
            return;
        }
        let Some(clip) = self.clips.get_mut(&id) else {
            return;
        };
        let old_track_id = clip.track_id;
        clip.track_id = new_track_id;
        clip.start_time = new_start.max(0.0);

        if old_track_id != new_track_id {
            if let Some(old) = self.tracks.iter_mut().find(|t| t.id == old_track_id) {
                old.remove_clip(id);
            }
        }
        if let Some(new) = self.tracks.iter_mut().find(|t| t.id == new_track_id) {
            new.push_clip(id);
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        debug!(clip = %id, track = %new_track_id, "clip moved");
    }

    /// Split a clip at a timeline position strictly inside its span.
    ///
    /// The left half keeps the original id; the right half is new. The
    /// halves' trims are complementary: concatenated they reconstruct the
    /// original source window exactly.
    pub fn split_clip(&mut self, id: Uuid, at: f64) -> Option<[Uuid; 2]> {
        let clip = self.clips.get(&id)?;
        if at <= clip.start_time || at >= clip.end_time() {
            return None;
        }
        let elapsed = at - clip.start_time;
        let remainder = clip.end_time() - at;
        let track_id = clip.track_id;

        let mut right = clip.clone();
        right.id = Uuid::new_v4();
        right.start_time = at;
        right.duration = remainder;
        right.trim_start += elapsed;

        let left = self.clips.get_mut(&id).expect("clip present");
        left.duration = elapsed;
        left.trim_end += remainder;

        let right_id = right.id;
        self.clips.insert(right_id, right);
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == track_id) {
            track.push_clip(right_id);
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        debug!(clip = %id, right = %right_id, at, "clip split");
        Some([id, right_id])
    }

    /// Duplicate a clip just after the original, with a small gap.
    pub fn duplicate_clip(&mut self, id: Uuid) -> Option<Uuid> {
        let clip = self.clips.get(&id)?;
        let mut copy = clip.clone();
        copy.id = Uuid::new_v4();
        copy.start_time = clip.end_time() + DUPLICATE_GAP;
        copy.name = format!("{} (copy)", clip.name);
        let copy_id = copy.id;
        let track_id = copy.track_id;

        self.clips.insert(copy_id, copy);
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == track_id) {
            track.push_clip(copy_id);
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
        Some(copy_id)
    }

    /// Recompute the derived timeline duration from the clip set.
    /// Callers must invoke this after any out-of-band mutation.
    pub fn refresh_duration(&mut self) {
        self.timeline_duration = self
            .clips
            .values()
            .map(|c| c.end_time())
            .fold(0.0, f64::max);
    }

    // ── Selection ───────────────────────────────────────────────

    /// Replace the selection with a single clip.
    pub fn select_clip(&mut self, id: Uuid) {
        if self.clips.contains_key(&id) {
            self.selection.clear();
            self.selection.push(id);
        }
    }

    /// Add a clip to the selection.
    pub fn add_to_selection(&mut self, id: Uuid) {
        if self.clips.contains_key(&id) && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove every selected clip as one history step.
    pub fn remove_selected_clips(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let selected: Vec<Uuid> = self.selection.clone();
        for id in selected {
            self.remove_clip_inner(id);
        }
        self.refresh_duration();
        self.dirty = true;
        self.commit_history();
    }

    // ── Playhead & zoom ─────────────────────────────────────────

    /// Move the playhead, clamped to the timeline bounds.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.timeline_duration.max(0.0));
    }

    /// Set the playhead without clamping to the duration (playback engine
    /// use; it clamps against its own end-of-timeline rule).
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Mark the session clean after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── History ─────────────────────────────────────────────────

    fn snapshot_slice(&self) -> serde_json::Value {
        serde_json::to_value(TimelineSlice {
            tracks: &self.tracks,
            clips: &self.clips,
        })
        .expect("timeline slice serializes")
    }

    fn push_history_now(&mut self) {
        let snapshot = self.snapshot_slice();
        self.history.push(snapshot);
    }

    /// Commit immediately: discrete operations are one undo step each.
    fn commit_history(&mut self) {
        if self.history.is_restoring() {
            return;
        }
        self.commit_debounce.cancel();
        self.push_history_now();
    }

    /// Arm the debounced commit: continuous gestures coalesce into one
    /// undo step once the pointer goes quiet.
    fn schedule_history_commit(&mut self) {
        if self.history.is_restoring() {
            return;
        }
        self.commit_debounce.schedule(Instant::now());
    }

    /// Drive the debounced commit. Call from the host's update loop.
    /// Returns true when a pending commit landed.
    pub fn maintain(&mut self, now: Instant) -> bool {
        if self.commit_debounce.poll(now) {
            self.push_history_now();
            return true;
        }
        false
    }

    /// Land any pending debounced commit right now.
    pub fn flush_pending_commit(&mut self) {
        if self.commit_debounce.flush() {
            self.push_history_now();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one history entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        self.flush_pending_commit();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_snapshot(&snapshot);
        true
    }

    /// Step forward one history entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        self.flush_pending_commit();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_snapshot(&snapshot);
        true
    }

    fn apply_snapshot(&mut self, snapshot: &serde_json::Value) {
        #[derive(serde::Deserialize)]
        struct OwnedSlice {
            tracks: Vec<Track>,
            clips: HashMap<Uuid, Clip>,
        }

        let slice: OwnedSlice = match serde_json::from_value(snapshot.clone()) {
            Ok(slice) => slice,
            Err(err) => {
                warn!(error = %err, "history snapshot failed to deserialize");
                return;
            }
        };

        self.history.set_restoring(true);
        self.tracks = slice.tracks;
        self.clips = slice.clips;
        self.selection.retain(|id| self.clips.contains_key(id));
        self.commit_debounce.cancel();
        self.refresh_duration();
        self.dirty = true;
        self.history.set_restoring(false);
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Serialize the session into a document for saving or export.
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            project: self.project.clone(),
            tracks: self.tracks.clone(),
            clips: self.clips.clone(),
            caption_settings: self.caption_settings.clone(),
        }
    }

    /// Replace the in-memory state wholesale (used on load).
    pub fn hydrate(&mut self, document: SessionDocument) {
        self.project = document.project;
        self.caption_settings = document.caption_settings;
        self.tracks = document.tracks;
        self.clips = document.clips;
        self.selection.clear();
        self.current_time = 0.0;
        self.commit_debounce.cancel();
        self.refresh_duration();
        self.dirty = false;
        self.history.clear();
        self.push_history_now();
        info!(
            tracks = self.tracks.len(),
            clips = self.clips.len(),
            "session hydrated"
        );
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Project::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipSource;
    use proptest::prelude::*;
    use std::time::Duration;

    fn session_with_track() -> (EditorSession, Uuid) {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Video, None);
        (session, track)
    }

    fn video_draft(track: Uuid, secs: f64) -> ClipDraft {
        ClipDraft::new(
            track,
            "clip",
            ClipContent::Video,
            ClipSource::new("media/test.mp4", secs),
        )
    }

    #[test]
    fn test_add_track_auto_names_by_kind() {
        let mut session = EditorSession::default();
        session.add_track(TrackKind::Video, None);
        session.add_track(TrackKind::Audio, None);
        session.add_track(TrackKind::Video, None);

        let names: Vec<&str> = session.tracks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Video 1", "Audio 1", "Video 2"]);
    }

    #[test]
    fn test_add_clip_appends_after_occupied_span() {
        let (mut session, track) = session_with_track();

        let first = session.add_clip(video_draft(track, 10.0)).unwrap();
        assert_eq!(session.clip(first).unwrap().start_time, 0.0);

        // Second clip also drafted at 0 lands after the first.
        let second = session.add_clip(video_draft(track, 10.0)).unwrap();
        assert_eq!(session.clip(second).unwrap().start_time, 10.0);
        assert_eq!(session.timeline_duration(), 20.0);

        // An explicit nonzero start is honored.
        let third = session.add_clip(video_draft(track, 5.0).at(2.5)).unwrap();
        assert_eq!(session.clip(third).unwrap().start_time, 2.5);
    }

    #[test]
    fn test_add_clip_unknown_track_is_none() {
        let mut session = EditorSession::default();
        assert!(session.add_clip(video_draft(Uuid::new_v4(), 5.0)).is_none());
        assert!(session.clips().is_empty());
    }

    #[test]
    fn test_add_clip_selects_new_clip() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 5.0)).unwrap();
        assert!(session.selection().contains(&id));
    }

    #[test]
    fn test_split_clip_complementary_trims() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        let [left_id, right_id] = session.split_clip(id, 5.0).unwrap();
        assert_eq!(left_id, id);

        let left = session.clip(left_id).unwrap();
        let right = session.clip(right_id).unwrap();
        assert_eq!(left.duration, 5.0);
        assert_eq!(left.trim_end, 5.0);
        assert_eq!(right.start_time, 5.0);
        assert_eq!(right.duration, 5.0);
        assert_eq!(right.trim_start, 5.0);

        // Durations concatenate to the original.
        assert_eq!(left.duration + right.duration, 10.0);
        // Both halves are on the same track.
        let track = session.track(track).unwrap();
        assert!(track.contains(left_id) && track.contains(right_id));
    }

    #[test]
    fn test_split_outside_bounds_is_none() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        assert!(session.split_clip(id, 0.0).is_none()); // at start
        assert!(session.split_clip(id, 10.0).is_none()); // at end
        assert!(session.split_clip(id, -1.0).is_none());
        assert!(session.split_clip(id, 15.0).is_none());
        assert!(session.split_clip(Uuid::new_v4(), 5.0).is_none());
    }

    #[test]
    fn test_move_clip_clamps_negative_start() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        session.move_clip(id, track, -3.0);
        assert_eq!(session.clip(id).unwrap().start_time, 0.0);
    }

    #[test]
    fn test_move_clip_across_tracks_updates_lists() {
        let (mut session, track_a) = session_with_track();
        let track_b = session.add_track(TrackKind::Video, None);
        let id = session.add_clip(video_draft(track_a, 10.0)).unwrap();

        session.move_clip(id, track_b, 4.0);

        assert!(!session.track(track_a).unwrap().contains(id));
        assert!(session.track(track_b).unwrap().contains(id));
        let clip = session.clip(id).unwrap();
        assert_eq!(clip.track_id, track_b);
        assert_eq!(clip.start_time, 4.0);

        // Moving within the same track is idempotent on the list.
        session.move_clip(id, track_b, 6.0);
        let list = &session.track(track_b).unwrap().clip_ids;
        assert_eq!(list.iter().filter(|c| **c == id).count(), 1);
    }

    #[test]
    fn test_remove_track_cascades() {
        let (mut session, track) = session_with_track();
        let keep_track = session.add_track(TrackKind::Audio, None);
        let doomed = session.add_clip(video_draft(track, 10.0)).unwrap();
        let kept = session
            .add_clip(ClipDraft::new(
                keep_track,
                "music",
                ClipContent::Audio,
                ClipSource::new("media/music.mp3", 30.0),
            ))
            .unwrap();
        session.add_to_selection(doomed);

        session.remove_track(track);

        assert!(session.clip(doomed).is_none());
        assert!(session.clip(kept).is_some());
        assert!(!session.selection().contains(&doomed));
        assert_eq!(session.timeline_duration(), 30.0);
    }

    #[test]
    fn test_duplicate_places_copy_after_original() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        let copy = session.duplicate_clip(id).unwrap();
        let copy = session.clip(copy).unwrap();
        assert!((copy.start_time - 10.1).abs() < 1e-9);
        assert_eq!(copy.name, "clip (copy)");
        assert!(session.duplicate_clip(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_clip_clamps() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        session.update_clip(
            id,
            ClipPatch {
                volume: Some(1.7),
                duration: Some(0.01),
                trim_start: Some(-2.0),
                ..Default::default()
            },
        );
        let clip = session.clip(id).unwrap();
        assert_eq!(clip.volume, 1.0);
        assert_eq!(clip.duration, MIN_CLIP_DURATION);
        assert_eq!(clip.trim_start, 0.0);
    }

    #[test]
    fn test_update_clip_rejects_kind_change() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        session.update_clip(
            id,
            ClipPatch {
                content: Some(ClipContent::Text(Default::default())),
                ..Default::default()
            },
        );
        assert_eq!(session.clip(id).unwrap().kind(), crate::ClipKind::Video);
    }

    #[test]
    fn test_reorder_tracks_requires_permutation() {
        let (mut session, a) = session_with_track();
        let b = session.add_track(TrackKind::Audio, None);

        session.reorder_tracks(&[b, a]);
        let order: Vec<Uuid> = session.tracks().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![b, a]);

        // Wrong length or foreign id: untouched.
        session.reorder_tracks(&[a]);
        session.reorder_tracks(&[a, Uuid::new_v4()]);
        let order2: Vec<Uuid> = session.tracks().iter().map(|t| t.id).collect();
        assert_eq!(order2, vec![b, a]);
    }

    #[test]
    fn test_refresh_duration_is_idempotent() {
        let (mut session, track) = session_with_track();
        session.add_clip(video_draft(track, 10.0)).unwrap();
        session.refresh_duration();
        let first = session.timeline_duration();
        session.refresh_duration();
        assert_eq!(first, session.timeline_duration());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let (mut session, track) = session_with_track();
        session.add_clip(video_draft(track, 10.0)).unwrap();
        session.add_clip(video_draft(track, 10.0)).unwrap();

        let after_adds = session.to_document();

        assert!(session.undo());
        assert_eq!(session.clips().len(), 1);
        assert!(session.undo());
        assert!(session.clips().is_empty());
        assert_eq!(session.timeline_duration(), 0.0);

        assert!(session.redo());
        assert!(session.redo());
        let restored = session.to_document();
        assert_eq!(restored.clips, after_adds.clips);
        assert_eq!(restored.tracks, after_adds.tracks);
        assert!(!session.redo());
    }

    #[test]
    fn test_gesture_coalesces_to_one_undo_step() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        // Simulated drag: many intermediate updates, then quiet.
        for step in 1..=20 {
            session.update_clip(
                id,
                ClipPatch {
                    start_time: Some(step as f64 * 0.25),
                    ..Default::default()
                },
            );
        }
        assert!(session.maintain(Instant::now() + Duration::from_millis(200)));

        assert_eq!(session.clip(id).unwrap().start_time, 5.0);
        assert!(session.undo());
        // One undo rewinds the whole gesture.
        assert_eq!(session.clip(id).unwrap().start_time, 0.0);
    }

    #[test]
    fn test_undo_flushes_pending_gesture() {
        let (mut session, track) = session_with_track();
        let id = session.add_clip(video_draft(track, 10.0)).unwrap();

        session.update_clip(
            id,
            ClipPatch {
                start_time: Some(3.0),
                ..Default::default()
            },
        );
        // Undo while the debounce is still pending: the gesture state is
        // committed first, then rewound.
        assert!(session.undo());
        assert_eq!(session.clip(id).unwrap().start_time, 0.0);
        assert!(session.redo());
        assert_eq!(session.clip(id).unwrap().start_time, 3.0);
    }

    #[test]
    fn test_remove_selected_is_single_history_step() {
        let (mut session, track) = session_with_track();
        let a = session.add_clip(video_draft(track, 5.0)).unwrap();
        let b = session.add_clip(video_draft(track, 5.0)).unwrap();
        session.select_clip(a);
        session.add_to_selection(b);

        session.remove_selected_clips();
        assert!(session.clips().is_empty());

        assert!(session.undo());
        assert_eq!(session.clips().len(), 2);
    }

    #[test]
    fn test_seek_clamps_to_timeline() {
        let (mut session, track) = session_with_track();
        session.add_clip(video_draft(track, 10.0)).unwrap();

        session.seek(25.0);
        assert_eq!(session.current_time(), 10.0);
        session.seek(-5.0);
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut session = EditorSession::default();
        session.set_zoom(10_000.0);
        assert_eq!(session.zoom(), MAX_ZOOM);
        session.set_zoom(0.001);
        assert_eq!(session.zoom(), MIN_ZOOM);
    }

    // ── Referential invariants under random operations ──────────

    #[derive(Debug, Clone)]
    enum Op {
        AddClip { track_sel: usize, secs: f64 },
        Remove { clip_sel: usize },
        Move { clip_sel: usize, track_sel: usize, start: f64 },
        Split { clip_sel: usize, frac: f64 },
        Duplicate { clip_sel: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 0.5f64..30.0).prop_map(|(track_sel, secs)| Op::AddClip { track_sel, secs }),
            (0usize..16).prop_map(|clip_sel| Op::Remove { clip_sel }),
            (0usize..16, 0usize..3, -5.0f64..40.0)
                .prop_map(|(clip_sel, track_sel, start)| Op::Move { clip_sel, track_sel, start }),
            (0usize..16, 0.1f64..0.9).prop_map(|(clip_sel, frac)| Op::Split { clip_sel, frac }),
            (0usize..16).prop_map(|clip_sel| Op::Duplicate { clip_sel }),
        ]
    }

    fn check_invariants(session: &EditorSession) {
        // Every clip's track exists and lists the clip.
        for clip in session.clips().values() {
            let track = session.track(clip.track_id).expect("clip's track exists");
            assert!(track.contains(clip.id), "track lists its clip");
            assert!(clip.start_time >= 0.0);
            // Splitting near an edge may leave a sliver shorter than the
            // add/update minimum, but never a non-positive duration.
            assert!(clip.duration > 0.0);
            assert!(clip.trim_start >= 0.0 && clip.trim_end >= 0.0);
        }
        // Every listed id resolves to a clip on that track.
        for track in session.tracks() {
            for id in &track.clip_ids {
                let clip = session.clip(*id).expect("listed clip exists");
                assert_eq!(clip.track_id, track.id);
            }
        }
        // Derived duration matches the definition.
        let expected = session
            .clips()
            .values()
            .map(|c| c.end_time())
            .fold(0.0, f64::max);
        assert_eq!(session.timeline_duration(), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn random_ops_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let mut session = EditorSession::default();
            let tracks = [
                session.add_track(TrackKind::Video, None),
                session.add_track(TrackKind::Video, None),
                session.add_track(TrackKind::Audio, None),
            ];

            for op in ops {
                let ids: Vec<Uuid> = {
                    let mut ids: Vec<Uuid> = session.clips().keys().copied().collect();
                    ids.sort();
                    ids
                };
                match op {
                    Op::AddClip { track_sel, secs } => {
                        session.add_clip(video_draft(tracks[track_sel % 3], secs));
                    }
                    Op::Remove { clip_sel } if !ids.is_empty() => {
                        session.remove_clip(ids[clip_sel % ids.len()]);
                    }
                    Op::Move { clip_sel, track_sel, start } if !ids.is_empty() => {
                        session.move_clip(ids[clip_sel % ids.len()], tracks[track_sel % 3], start);
                    }
                    Op::Split { clip_sel, frac } if !ids.is_empty() => {
                        let id = ids[clip_sel % ids.len()];
                        let at = {
                            let clip = session.clip(id).unwrap();
                            clip.start_time + clip.duration * frac
                        };
                        session.split_clip(id, at);
                    }
                    Op::Duplicate { clip_sel } if !ids.is_empty() => {
                        session.duplicate_clip(ids[clip_sel % ids.len()]);
                    }
                    _ => {}
                }
                check_invariants(&session);
            }
        }
    }
}
