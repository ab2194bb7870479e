//! Snapshot-based undo/redo history.
//!
//! History operates over the serialized `{tracks, clips}` slice only;
//! selection, playhead, and playback flags are deliberately excluded so an
//! undo never yanks the user's view around. Snapshots are JSON values,
//! which makes the identical-state check a plain equality test.

use serde_json::Value;
use tracing::debug;

/// Default maximum number of history entries.
pub const MAX_HISTORY: usize = 50;

/// Bounded snapshot stack with a pointer.
#[derive(Debug)]
pub struct History {
    /// Snapshots, oldest first.
    entries: Vec<Value>,
    /// Index of the current entry in `entries`.
    index: usize,
    /// Maximum history depth.
    max_entries: usize,
    /// Re-entrancy guard: suppresses pushes while a restore is mutating
    /// the observed state.
    restoring: bool,
}

impl History {
    /// Create a new history with the given maximum depth.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_entries,
            restoring: false,
        }
    }

    /// Record a snapshot of the current state.
    ///
    /// No-op while a restore is in progress, and when the snapshot is
    /// identical to the current entry (a pointer move that didn't change
    /// geometry must not spend an undo step). A push after undos discards
    /// the abandoned redo tail.
    pub fn push(&mut self, snapshot: Value) {
        if self.restoring {
            return;
        }
        if let Some(current) = self.entries.get(self.index) {
            if *current == snapshot {
                return;
            }
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
        debug!(entries = self.entries.len(), "history snapshot pushed");
    }

    /// Step back one entry. Returns the snapshot to restore, or `None`
    /// when already at the first entry (or the entry is missing).
    pub fn undo(&mut self) -> Option<&Value> {
        if self.index == 0 || self.entries.is_empty() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry. Returns the snapshot to restore, or `None`
    /// when already at the last entry.
    pub fn redo(&mut self) -> Option<&Value> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// Whether a restore is currently in progress.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Set the re-entrancy guard around a restore.
    pub(crate) fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_undo_redo_walk() {
        let mut h = History::new(10);
        h.push(json!({"n": 0}));
        h.push(json!({"n": 1}));
        h.push(json!({"n": 2}));

        assert!(h.can_undo());
        assert!(!h.can_redo());

        assert_eq!(h.undo().unwrap()["n"], 1);
        assert_eq!(h.undo().unwrap()["n"], 0);
        assert!(h.undo().is_none()); // at the first entry

        assert_eq!(h.redo().unwrap()["n"], 1);
        assert_eq!(h.redo().unwrap()["n"], 2);
        assert!(h.redo().is_none()); // at the last entry
    }

    #[test]
    fn test_identical_snapshot_is_skipped() {
        let mut h = History::new(10);
        h.push(json!({"n": 0}));
        h.push(json!({"n": 0}));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut h = History::new(10);
        h.push(json!({"n": 0}));
        h.push(json!({"n": 1}));
        h.push(json!({"n": 2}));
        h.undo();
        h.undo();

        h.push(json!({"n": 9}));
        assert!(!h.can_redo());
        assert_eq!(h.len(), 2);
        assert_eq!(h.undo().unwrap()["n"], 0);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = History::new(3);
        for n in 0..5 {
            h.push(json!({ "n": n }));
        }
        assert_eq!(h.len(), 3);
        // Oldest reachable entry is n=2.
        h.undo();
        assert_eq!(h.undo().unwrap()["n"], 2);
        assert!(h.undo().is_none());
    }

    #[test]
    fn test_push_suppressed_while_restoring() {
        let mut h = History::new(10);
        h.push(json!({"n": 0}));
        h.set_restoring(true);
        h.push(json!({"n": 1}));
        h.set_restoring(false);
        assert_eq!(h.len(), 1);
    }
}
