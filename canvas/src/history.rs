//! Snapshot undo/redo.
//!
//! Every mutation is preceded by [`History::save`], which pushes a full copy
//! of the element list. Undo pops the most recent copy and parks the current
//! state on the redo stack; redo does the reverse. There are no deltas: a
//! snapshot is the whole board.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::doc::{DocStore, Element};

/// Undo and redo stacks of whole-board snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Vec<Element>>,
    redo_stack: Vec<Vec<Element>>,
    /// Maximum snapshots kept on the undo stack. Zero disables history.
    limit: usize,
}

impl History {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo_stack: Vec::new(), redo_stack: Vec::new(), limit }
    }

    /// Record the current state before a mutation. Clears redo.
    pub fn save(&mut self, doc: &DocStore) {
        if self.limit == 0 {
            return;
        }
        self.undo_stack.push(doc.snapshot());
        self.redo_stack.clear();

        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop the previous state, parking `current` for redo.
    pub fn undo(&mut self, current: &DocStore) -> Option<Vec<Element>> {
        let prev = self.undo_stack.pop()?;
        self.redo_stack.push(current.snapshot());
        Some(prev)
    }

    /// Pop the next state, parking `current` for undo.
    pub fn redo(&mut self, current: &DocStore) -> Option<Vec<Element>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.snapshot());
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
