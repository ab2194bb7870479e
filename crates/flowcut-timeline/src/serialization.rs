//! Project persistence with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible saves.

use std::collections::HashMap;

use flowcut_core::{FlowcutError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::Clip;
use crate::project::{CaptionSettings, Project};
use crate::track::Track;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// The full serialized session state: everything `hydrate` replaces and
/// the export service consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub project: Project,
    pub tracks: Vec<Track>,
    pub clips: HashMap<Uuid, Clip>,
    #[serde(default)]
    pub caption_settings: CaptionSettings,
}

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The session document.
    pub document: SessionDocument,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    /// Wrap a session document for saving.
    pub fn new(document: SessionDocument) -> Self {
        Self {
            version: CURRENT_VERSION,
            document,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| FlowcutError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        // First, read just the version.
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| FlowcutError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(FlowcutError::Serialization(format!(
                "Project file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| FlowcutError::Serialization(format!("Failed to parse project: {}", e)))
    }

    /// Save to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare document with no version wrapper.
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "document": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(FlowcutError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipContent, ClipDraft, ClipSource};
    use crate::store::EditorSession;
    use crate::track::TrackKind;

    fn build_session() -> EditorSession {
        let mut session = EditorSession::new(Project::new("Roundtrip", 1080, 1920));
        let video = session.add_track(TrackKind::Video, None);
        let audio = session.add_track(TrackKind::Audio, None);
        session.add_clip(ClipDraft::new(
            video,
            "Intro",
            ClipContent::Video,
            ClipSource::new("media/intro.mp4", 8.0),
        ));
        session.add_clip(ClipDraft::new(
            audio,
            "Bed",
            ClipContent::Audio,
            ClipSource::new("media/bed.mp3", 30.0),
        ));
        session
    }

    #[test]
    fn test_document_roundtrip() {
        let session = build_session();
        let file = ProjectFile::new(session.to_document());

        let json = file.to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();

        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.document, session.to_document());
    }

    #[test]
    fn test_hydrate_restores_state_and_clears_dirty() {
        let session = build_session();
        let document = session.to_document();

        let mut fresh = EditorSession::default();
        fresh.hydrate(document.clone());

        assert_eq!(fresh.to_document(), document);
        assert!(!fresh.is_dirty());
        assert_eq!(fresh.timeline_duration(), 30.0);
        assert!(fresh.selection().is_empty());
    }

    #[test]
    fn test_migration_v0() {
        // A v0 file is the bare document with no wrapper.
        let session = build_session();
        let raw = serde_json::to_vec(&session.to_document()).unwrap();

        let loaded = ProjectFile::from_json(&raw).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.document.project.name, "Roundtrip");
    }

    #[test]
    fn test_future_version_rejected() {
        let json = serde_json::json!({
            "version": 999,
            "document": {},
            "app_version": "99.0.0",
        });
        let data = serde_json::to_vec(&json).unwrap();
        assert!(ProjectFile::from_json(&data).is_err());
    }
}
