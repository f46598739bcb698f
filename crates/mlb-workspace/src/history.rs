//! Bounded undo/redo log
//!
//! Oldest entries are evicted first once the undo stack exceeds
//! `max_history_size`; eviction is routine, not an error.

use crate::action::WorkspaceAction;
use std::collections::VecDeque;

/// Undo and redo stacks of forward actions
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<WorkspaceAction>,
    redo_stack: Vec<WorkspaceAction>,
    max_history_size: usize,
}

impl History {
    /// Create empty history with the given bound
    #[inline]
    #[must_use]
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history_size.min(256)),
            redo_stack: Vec::new(),
            max_history_size,
        }
    }

    /// Record a new user action
    ///
    /// Clears the redo stack and returns the number of evicted entries.
    pub fn record(&mut self, action: WorkspaceAction) -> usize {
        self.redo_stack.clear();
        self.push_undo(action)
    }

    /// Push onto the undo stack without touching redo (used by redo)
    pub(crate) fn push_undo(&mut self, action: WorkspaceAction) -> usize {
        self.undo_stack.push_back(action);
        let mut evicted = 0;
        while self.undo_stack.len() > self.max_history_size {
            self.undo_stack.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub(crate) fn pop_undo(&mut self) -> Option<WorkspaceAction> {
        self.undo_stack.pop_back()
    }

    pub(crate) fn push_redo(&mut self, action: WorkspaceAction) {
        self.redo_stack.push(action);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<WorkspaceAction> {
        self.redo_stack.pop()
    }

    /// Check if undo is possible
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is possible
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Most recent undoable action
    #[inline]
    #[must_use]
    pub fn peek_undo(&self) -> Option<&WorkspaceAction> {
        self.undo_stack.back()
    }

    /// Most recent redoable action
    #[inline]
    #[must_use]
    pub fn peek_redo(&self) -> Option<&WorkspaceAction> {
        self.redo_stack.last()
    }

    /// Undo stack, oldest first
    pub fn undo_stack(&self) -> impl Iterator<Item = &WorkspaceAction> {
        self.undo_stack.iter()
    }

    /// Redo stack, oldest first
    #[inline]
    #[must_use]
    pub fn redo_stack(&self) -> &[WorkspaceAction] {
        &self.redo_stack
    }

    /// Number of undoable actions
    #[inline]
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable actions
    #[inline]
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Configured bound
    #[inline]
    #[must_use]
    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_HISTORY_SIZE)
    }
}
