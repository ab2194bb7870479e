//! Project metadata and preview settings.

use serde::{Deserialize, Serialize};

/// Project-level metadata. Carries no temporal state; the timeline's
/// duration is derived from its clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name (displayed in UI)
    pub name: String,
    /// Preview width in pixels
    pub width: u32,
    /// Preview height in pixels
    pub height: u32,
}

impl Project {
    /// Create a new project.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Create a project from an aspect preset.
    pub fn with_aspect(name: impl Into<String>, aspect: AspectPreset) -> Self {
        let (width, height) = aspect.dimensions();
        Self::new(name, width, height)
    }

    /// Preview aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project", 1920, 1080)
    }
}

/// Common preview aspect presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectPreset {
    /// 16:9 — YouTube / HD
    Widescreen,
    /// 9:16 — TikTok / Reels / Shorts
    Vertical,
    /// 1:1 — square
    Square,
    /// 4:5 — Instagram portrait
    Portrait,
}

impl AspectPreset {
    /// Pixel dimensions for this preset.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Widescreen => (1920, 1080),
            Self::Vertical => (1080, 1920),
            Self::Square => (1080, 1080),
            Self::Portrait => (1080, 1350),
        }
    }
}

/// Global caption rendering settings, hydrated and saved with the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSettings {
    pub enabled: bool,
    pub font_family: String,
    pub font_size: u32,
    /// CSS-style color string, e.g. "#ffffff".
    pub color: String,
    /// Vertical anchor as a fraction of preview height (0 = top, 1 = bottom).
    pub position_y: f64,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            font_family: "Inter".into(),
            font_size: 48,
            color: "#ffffff".into(),
            position_y: 0.85,
        }
    }
}
