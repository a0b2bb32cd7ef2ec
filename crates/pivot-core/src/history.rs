//! Snapshot-based undo/redo.
//!
//! History is a linear list of full repository snapshots with one current
//! pointer. Committing while the pointer is behind the tip drops every entry
//! after it, so there are never redo branches.
//!
//! ```text
//! commit A, commit B      [init, A, B]   pointer -> B
//! undo                    [init, A, B]   pointer -> A
//! commit C                [init, A, C]   pointer -> C   (B is gone)
//! ```

use crate::error::CommandError;
use crate::model::Case;

const INITIAL_MESSAGE: &str = "initial state";

/// One committed state: a full copy of the case sequence and the message of
/// the command that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub snapshot: Vec<Case>,
    pub message: String,
}

/// Snapshot handed back by [`History::undo`] or [`History::redo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    /// State to install into the repository.
    pub snapshot: Vec<Case>,
    /// Message of the command that was undone or redone.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    pointer: usize,
}

impl History {
    /// Start a history whose floor is `initial`.
    #[must_use]
    pub fn new(initial: Vec<Case>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                snapshot: initial,
                message: INITIAL_MESSAGE.to_string(),
            }],
            pointer: 0,
        }
    }

    /// Record a new state after the current pointer, discarding any redo entries.
    pub fn commit(&mut self, snapshot: Vec<Case>, message: impl Into<String>) {
        let message = message.into();
        let dropped = self.entries.len() - self.pointer - 1;
        self.entries.truncate(self.pointer + 1);
        self.entries.push(HistoryEntry { snapshot, message });
        self.pointer += 1;
        tracing::debug!(
            depth = self.entries.len(),
            dropped,
            "history committed"
        );
    }

    /// Step back one entry.
    ///
    /// # Errors
    ///
    /// [`CommandError::NoUndoableState`] at the initial entry.
    pub fn undo(&mut self) -> Result<Restored, CommandError> {
        if !self.can_undo() {
            return Err(CommandError::NoUndoableState);
        }
        let message = self.entries[self.pointer].message.clone();
        self.pointer -= 1;
        Ok(Restored {
            snapshot: self.entries[self.pointer].snapshot.clone(),
            message,
        })
    }

    /// Step forward one entry.
    ///
    /// # Errors
    ///
    /// [`CommandError::NoRedoableState`] at the newest entry.
    pub fn redo(&mut self) -> Result<Restored, CommandError> {
        if !self.can_redo() {
            return Err(CommandError::NoRedoableState);
        }
        self.pointer += 1;
        let entry = &self.entries[self.pointer];
        Ok(Restored {
            snapshot: entry.snapshot.clone(),
            message: entry.message.clone(),
        })
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// The entry under the pointer.
    #[must_use]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.pointer]
    }

    /// Number of entries, the initial one included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the initial entry cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Title;

    fn snap(titles: &[&str]) -> Vec<Case> {
        titles
            .iter()
            .map(|t| Case::new(Title::new(t).expect("valid title")))
            .collect()
    }

    #[test]
    fn fresh_history_cannot_move() {
        let mut history = History::new(snap(&[]));
        assert_eq!(history.undo(), Err(CommandError::NoUndoableState));
        assert_eq!(history.redo(), Err(CommandError::NoRedoableState));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().message, "initial state");
    }

    #[test]
    fn undo_returns_previous_snapshot_and_undone_message() {
        let mut history = History::new(snap(&[]));
        history.commit(snap(&["A"]), "added A");
        let restored = history.undo().expect("undo");
        assert_eq!(restored.snapshot, snap(&[]));
        assert_eq!(restored.message, "added A");

        let redone = history.redo().expect("redo");
        assert_eq!(redone.snapshot, snap(&["A"]));
        assert_eq!(redone.message, "added A");
    }

    #[test]
    fn commit_after_undo_discards_redo_branch() {
        let mut history = History::new(snap(&[]));
        history.commit(snap(&["A"]), "A");
        history.commit(snap(&["A", "B"]), "B");
        history.undo().expect("undo");
        history.commit(snap(&["A", "C"]), "C");

        assert_eq!(history.redo(), Err(CommandError::NoRedoableState));
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().snapshot, snap(&["A", "C"]));
    }

    #[test]
    fn committed_snapshot_is_independent() {
        let mut live = snap(&["A"]);
        let mut history = History::new(snap(&[]));
        history.commit(live.clone(), "A");
        live.push(Case::new(Title::new("B").expect("valid")));
        assert_eq!(history.current().snapshot, snap(&["A"]));
    }
}
