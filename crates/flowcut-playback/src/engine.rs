//! Playback state machine and real-time clock.
//!
//! While playing, the host calls [`PlaybackEngine::tick`] once per frame;
//! the engine advances the playhead by elapsed wall-clock time scaled by
//! the playback speed and re-plans media sync. The first tick after a
//! transport change only establishes the clock baseline.

use std::time::Instant;

use flowcut_timeline::EditorSession;
use tracing::debug;

use crate::sync::{build_sync_plan, MediaAdapter};

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Playback speed bounds.
const MIN_SPEED: f64 = 0.25;
const MAX_SPEED: f64 = 4.0;

/// The playback clock and media-sync driver for one session.
#[derive(Debug)]
pub struct PlaybackEngine {
    state: PlaybackState,
    speed: f64,
    /// Timestamp of the previous tick; `None` until the baseline tick.
    last_tick: Option<Instant>,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            speed: 1.0,
            last_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Start playing. Playing from at/after the timeline end restarts
    /// from the beginning.
    pub fn play(&mut self, session: &mut EditorSession, adapter: &mut dyn MediaAdapter) {
        if session.current_time() >= session.timeline_duration() {
            session.set_current_time(0.0);
        }
        self.state = PlaybackState::Playing;
        self.last_tick = None;
        self.sync(session, adapter);
        debug!(at = session.current_time(), "playback started");
    }

    /// Pause, holding the playhead in place.
    pub fn pause(&mut self, session: &EditorSession, adapter: &mut dyn MediaAdapter) {
        self.state = PlaybackState::Paused;
        self.last_tick = None;
        self.sync(session, adapter);
    }

    /// Stop and return the playhead to the start.
    pub fn stop(&mut self, session: &mut EditorSession, adapter: &mut dyn MediaAdapter) {
        self.state = PlaybackState::Stopped;
        self.last_tick = None;
        session.set_current_time(0.0);
        self.sync(session, adapter);
    }

    /// Space-bar behavior.
    pub fn toggle(&mut self, session: &mut EditorSession, adapter: &mut dyn MediaAdapter) {
        if self.is_playing() {
            self.pause(session, adapter);
        } else {
            self.play(session, adapter);
        }
    }

    /// Manual seek (scrub, Home/End). Clamps to the timeline and re-syncs.
    pub fn seek(&mut self, session: &mut EditorSession, adapter: &mut dyn MediaAdapter, time: f64) {
        session.seek(time);
        self.last_tick = None;
        self.sync(session, adapter);
    }

    /// Advance the clock. Call once per frame while the host is running.
    ///
    /// Reaching the timeline end clamps the playhead to the duration
    /// exactly (never overshooting) and auto-pauses.
    pub fn tick(
        &mut self,
        session: &mut EditorSession,
        adapter: &mut dyn MediaAdapter,
        now: Instant,
    ) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(last) = self.last_tick else {
            // Baseline tick: establish the clock, advance nothing.
            self.last_tick = Some(now);
            return;
        };
        let elapsed = now.duration_since(last).as_secs_f64();
        self.last_tick = Some(now);

        let duration = session.timeline_duration();
        let advanced = session.current_time() + elapsed * self.speed;

        if advanced >= duration {
            session.set_current_time(duration);
            self.state = PlaybackState::Paused;
            self.last_tick = None;
            debug!(at = duration, "reached timeline end, pausing");
        } else {
            session.set_current_time(advanced);
        }
        self.sync(session, adapter);
    }

    /// Recompute and apply the media sync plan for the current playhead.
    pub fn sync(&self, session: &EditorSession, adapter: &mut dyn MediaAdapter) {
        let plan = build_sync_plan(session, self.speed, self.is_playing(), adapter);
        adapter.apply(&plan);
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}
