//! Bridge from generation services to the timeline.
//!
//! Video/voice/caption generators asynchronously produce ready-made clip
//! payloads; the engine's only obligation is to turn a successful result
//! into an `add_clip` with provenance recorded. Failures stay with the
//! caller — nothing here retries.

use flowcut_timeline::{ClipContent, ClipDraft, ClipSource, EditorSession};
use tracing::info;
use uuid::Uuid;

use crate::SharedSession;

/// A completed generation result.
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    /// Where the generated artifact was stored.
    pub url: String,
    /// Artifact duration in seconds.
    pub duration: f64,
    /// Clip payload to place (kind plus any text/caption data).
    pub content: ClipContent,
    /// Display name for the new clip.
    pub name: String,
    /// Provider identifier, e.g. "kling", "elevenlabs".
    pub provider: String,
    /// The prompt the asset was generated from.
    pub prompt: String,
}

/// Place a generated asset on a track as a provenance-tagged clip.
/// Returns the new clip id, or `None` when the track is gone (the user
/// may have deleted it while generation ran).
pub fn place_generated_clip(
    session: &mut EditorSession,
    track_id: Uuid,
    asset: GeneratedAsset,
) -> Option<Uuid> {
    let draft = ClipDraft::new(
        track_id,
        asset.name,
        asset.content,
        ClipSource::new(asset.url, asset.duration),
    )
    .generated_by(asset.provider.clone(), asset.prompt);

    let id = session.add_clip(draft)?;
    info!(clip = %id, provider = %asset.provider, "generated clip placed");
    Some(id)
}

/// Completion-callback variant for results arriving off the editing
/// thread: locks the shared session for the single mutation.
pub fn place_generated_clip_shared(
    session: &SharedSession,
    track_id: Uuid,
    asset: GeneratedAsset,
) -> Option<Uuid> {
    let mut session = session.lock();
    place_generated_clip(&mut session, track_id, asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcut_timeline::{CaptionContent, CaptionSegment, TrackKind};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn voiceover_asset() -> GeneratedAsset {
        GeneratedAsset {
            url: "generated/vo-42.mp3".into(),
            duration: 7.5,
            content: ClipContent::Voiceover,
            name: "Narration".into(),
            provider: "elevenlabs".into(),
            prompt: "Warm welcome narration".into(),
        }
    }

    #[test]
    fn test_places_clip_with_provenance() {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Audio, None);

        let id = place_generated_clip(&mut session, track, voiceover_asset()).unwrap();
        let clip = session.clip(id).unwrap();
        assert_eq!(clip.source.url, "generated/vo-42.mp3");
        assert_eq!(clip.duration, 7.5);
        let provenance = clip.provenance.as_ref().unwrap();
        assert_eq!(provenance.provider, "elevenlabs");
        assert_eq!(provenance.prompt, "Warm welcome narration");
    }

    #[test]
    fn test_missing_track_leaves_state_unchanged() {
        let mut session = EditorSession::default();
        assert!(place_generated_clip(&mut session, Uuid::new_v4(), voiceover_asset()).is_none());
        assert!(session.clips().is_empty());
    }

    #[test]
    fn test_caption_asset_carries_segments() {
        let mut session = EditorSession::default();
        let track = session.add_track(TrackKind::Caption, None);

        let asset = GeneratedAsset {
            url: "generated/captions-7.json".into(),
            duration: 6.0,
            content: ClipContent::Caption(CaptionContent {
                segments: vec![
                    CaptionSegment {
                        start: 0.0,
                        end: 3.0,
                        text: "Hello there".into(),
                    },
                    CaptionSegment {
                        start: 3.0,
                        end: 6.0,
                        text: "and welcome".into(),
                    },
                ],
                audio_clip_id: None,
            }),
            name: "Captions".into(),
            provider: "whisper".into(),
            prompt: String::new(),
        };

        let id = place_generated_clip(&mut session, track, asset).unwrap();
        match &session.clip(id).unwrap().content {
            ClipContent::Caption(captions) => assert_eq!(captions.segments.len(), 2),
            other => panic!("expected caption content, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_session_completion() {
        let session: SharedSession = Arc::new(Mutex::new(EditorSession::default()));
        let track = session.lock().add_track(TrackKind::Audio, None);

        let id = place_generated_clip_shared(&session, track, voiceover_asset()).unwrap();
        assert!(session.lock().clip(id).is_some());
    }
}
