//! Debounce utility - coalesces a burst of rapid events into one.
//!
//! During a drag or trim gesture the store mutates many times per second;
//! committing a history entry for every intermediate frame would make undo
//! useless. Each mutation calls [`Debounce::schedule`], which (re)arms the
//! timer; the host's update loop calls [`Debounce::poll`], which fires once
//! the burst has gone quiet for the configured delay.
//!
//! The current instant is passed in rather than read from the system clock
//! so callers can drive the timer deterministically in tests.

use std::time::{Duration, Instant};

/// A resettable single-shot timer.
#[derive(Debug, Clone)]
pub struct Debounce {
    /// Quiet period required before firing.
    delay: Duration,
    /// Deadline of the pending shot, if armed.
    deadline: Option<Instant>,
}

impl Debounce {
    /// Create with the given quiet period in milliseconds.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            deadline: None,
        }
    }

    /// Arm the timer, or push the deadline out if already armed.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fire if the quiet period has elapsed. Returns true at most once per
    /// [`Debounce::schedule`] burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Fire immediately if armed, regardless of the deadline. Used when a
    /// pending commit must land before an undo or a save.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a shot is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
