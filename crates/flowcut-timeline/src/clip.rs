//! Clip types for the timeline.

use flowcut_core::TimeRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reference to a media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSource {
    /// Source URL (upload, library asset, or generated artifact)
    pub url: String,
    /// Full duration of the source in seconds
    pub duration: f64,
}

impl ClipSource {
    /// Create a new source reference.
    pub fn new(url: impl Into<String>, duration: f64) -> Self {
        Self {
            url: url.into(),
            duration,
        }
    }
}

/// Kind of clip. Derived from the clip's content variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Image,
    Audio,
    Voiceover,
    Caption,
    Text,
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Voiceover => "voiceover",
            Self::Caption => "caption",
            Self::Text => "text",
        };
        f.write_str(s)
    }
}

/// 2D placement of a visual clip within the preview, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal offset from center, percent of preview width
    pub x: f64,
    /// Vertical offset from center, percent of preview height
    pub y: f64,
    /// Uniform scale factor (1.0 = fit)
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// Transition style applied at a clip edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    #[default]
    None,
    Crossfade,
    WipeLeft,
    WipeRight,
    Slide,
    Dissolve,
}

/// A transition at a clip's in or out edge. Rendering-time concern only;
/// never alters the clip's start or duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Transition duration in seconds
    pub duration: f64,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            kind: TransitionKind::None,
            duration: 0.0,
        }
    }
}

/// Styling for a text clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    /// CSS-style color string
    pub color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".into(),
            font_size: 64,
            color: "#ffffff".into(),
            bold: false,
            italic: false,
        }
    }
}

/// Payload of a text clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

/// One timed caption segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Segment start, seconds relative to the clip start
    pub start: f64,
    /// Segment end, seconds relative to the clip start
    pub end: f64,
    pub text: String,
}

/// Payload of a caption clip: ordered segments plus the audio clip they
/// were transcribed from, if still present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionContent {
    pub segments: Vec<CaptionSegment>,
    #[serde(default)]
    pub audio_clip_id: Option<Uuid>,
}

/// Type-specific clip payload, keyed on the clip's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipContent {
    Video,
    Image,
    Audio,
    Voiceover,
    Text(TextContent),
    Caption(CaptionContent),
}

impl ClipContent {
    /// The clip kind this content implies.
    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Video => ClipKind::Video,
            Self::Image => ClipKind::Image,
            Self::Audio => ClipKind::Audio,
            Self::Voiceover => ClipKind::Voiceover,
            Self::Text(_) => ClipKind::Text,
            Self::Caption(_) => ClipKind::Caption,
        }
    }
}

/// Provenance of an AI-generated clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProvenance {
    /// Provider identifier, e.g. "kling", "elevenlabs"
    pub provider: String,
    /// The prompt the asset was generated from
    pub prompt: String,
}

/// A clip placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Owning track; must reference an existing track
    pub track_id: Uuid,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Type-specific payload
    pub content: ClipContent,
    /// Source media reference
    pub source: ClipSource,
    /// Timeline position in seconds, >= 0
    pub start_time: f64,
    /// Timeline duration in seconds, >= MIN_CLIP_DURATION
    pub duration: f64,
    /// Seconds trimmed off the head of the source
    #[serde(default)]
    pub trim_start: f64,
    /// Seconds trimmed off the tail of the source
    #[serde(default)]
    pub trim_end: f64,
    /// Volume in [0, 1]
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub muted: bool,
    /// Playback speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Opacity in [0, 1], visual clips only
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub transition_in: Transition,
    #[serde(default)]
    pub transition_out: Transition,
    /// Set when the clip's source was AI-generated
    #[serde(default)]
    pub provenance: Option<AiProvenance>,
}

fn default_volume() -> f64 {
    1.0
}
fn default_speed() -> f64 {
    1.0
}
fn default_opacity() -> f64 {
    1.0
}

impl Clip {
    /// The clip kind, derived from its content.
    pub fn kind(&self) -> ClipKind {
        self.content.kind()
    }

    /// End time on the timeline.
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Timeline range occupied by this clip.
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// Whether the clip exposes a window into a fixed-length source.
    /// Fixed-source clips trim; the rest extend freely.
    pub fn has_fixed_source(&self) -> bool {
        matches!(
            self.kind(),
            ClipKind::Video | ClipKind::Audio | ClipKind::Voiceover
        )
    }

    /// Whether the clip carries audio that playback must drive.
    pub fn is_audible(&self) -> bool {
        matches!(
            self.kind(),
            ClipKind::Video | ClipKind::Audio | ClipKind::Voiceover
        )
    }

    /// Volume after the mute flag.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Source position corresponding to a timeline position inside the clip.
    pub fn source_position(&self, timeline_time: f64) -> f64 {
        self.trim_start + (timeline_time - self.start_time)
    }
}

/// All clip fields except the id, which the session assigns.
///
/// Drafts are how external producers (uploads, generation services) hand a
/// ready-made clip payload to the session.
#[derive(Debug, Clone)]
pub struct ClipDraft {
    pub track_id: Uuid,
    pub name: String,
    pub content: ClipContent,
    pub source: ClipSource,
    pub start_time: f64,
    pub duration: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub volume: f64,
    pub muted: bool,
    pub speed: f64,
    pub opacity: f64,
    pub transform: Option<Transform>,
    pub transition_in: Transition,
    pub transition_out: Transition,
    pub provenance: Option<AiProvenance>,
}

impl ClipDraft {
    /// Create a draft at t=0 spanning the whole source.
    pub fn new(
        track_id: Uuid,
        name: impl Into<String>,
        content: ClipContent,
        source: ClipSource,
    ) -> Self {
        let duration = source.duration;
        Self {
            track_id,
            name: name.into(),
            content,
            source,
            start_time: 0.0,
            duration,
            trim_start: 0.0,
            trim_end: 0.0,
            volume: 1.0,
            muted: false,
            speed: 1.0,
            opacity: 1.0,
            transform: None,
            transition_in: Transition::default(),
            transition_out: Transition::default(),
            provenance: None,
        }
    }

    /// Set the timeline start.
    pub fn at(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Set the timeline duration.
    pub fn lasting(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Record AI provenance.
    pub fn generated_by(mut self, provider: impl Into<String>, prompt: impl Into<String>) -> Self {
        self.provenance = Some(AiProvenance {
            provider: provider.into(),
            prompt: prompt.into(),
        });
        self
    }
}
