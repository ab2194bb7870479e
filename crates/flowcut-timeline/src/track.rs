//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Caption,
}

impl TrackKind {
    /// Display label, used for auto-naming new tracks.
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
            Self::Caption => "Caption",
        }
    }

    /// Default display height in pixels.
    pub fn default_height(self) -> f32 {
        match self {
            Self::Video => 64.0,
            Self::Audio => 48.0,
            Self::Text | Self::Caption => 32.0,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lane of clips. Tracks hold clip ids in placement order; the clips
/// themselves live in the session's clip map. The id list must always
/// equal the set of clips whose `track_id` points here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Display height in pixels
    pub height: f32,
    /// Is track muted
    #[serde(default)]
    pub muted: bool,
    /// Is track locked (prevents edits)
    #[serde(default)]
    pub locked: bool,
    /// Is track visible in the preview
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Ids of the clips on this track
    pub clip_ids: Vec<Uuid>,
}

fn default_visible() -> bool {
    true
}

impl Track {
    /// Create a new empty track.
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            height: kind.default_height(),
            muted: false,
            locked: false,
            visible: true,
            clip_ids: Vec::new(),
        }
    }

    /// Whether a clip id is on this track.
    pub fn contains(&self, clip_id: Uuid) -> bool {
        self.clip_ids.contains(&clip_id)
    }

    /// Append a clip id if not already present.
    pub fn push_clip(&mut self, clip_id: Uuid) {
        if !self.contains(clip_id) {
            self.clip_ids.push(clip_id);
        }
    }

    /// Remove a clip id. Returns whether it was present.
    pub fn remove_clip(&mut self, clip_id: Uuid) -> bool {
        let before = self.clip_ids.len();
        self.clip_ids.retain(|id| *id != clip_id);
        self.clip_ids.len() != before
    }
}
