use std::collections::VecDeque;

use super::Document;
use crate::config::DEFAULT_UNDO_LIMIT;
use crate::error::{Result, SheetError};

/// Undo/redo over whole-document snapshots.
///
/// Documents are values, so history simply keeps the previous ones. The undo
/// stack is bounded; the oldest snapshot is dropped first.
#[derive(Clone, Debug)]
pub struct History {
    current: Document,
    undo_stack: VecDeque<Document>,
    redo_stack: Vec<Document>,
    limit: usize,
}

impl History {
    pub fn new(doc: Document) -> Self {
        History::with_limit(doc, DEFAULT_UNDO_LIMIT)
    }

    pub fn with_limit(doc: Document, limit: usize) -> Self {
        History {
            current: doc,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    pub fn current(&self) -> &Document {
        &self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Make `next` the current document. Clears the redo stack.
    pub fn apply(&mut self, next: Document) {
        let previous = std::mem::replace(&mut self.current, next);
        if self.limit > 0 {
            self.undo_stack.push_back(previous);
            while self.undo_stack.len() > self.limit {
                self.undo_stack.pop_front();
            }
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> Result<&Document> {
        let previous = self.undo_stack.pop_back().ok_or(SheetError::NothingToUndo)?;
        let undone = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(undone);
        Ok(&self.current)
    }

    pub fn redo(&mut self) -> Result<&Document> {
        let next = self.redo_stack.pop().ok_or(SheetError::NothingToRedo)?;
        let redone = std::mem::replace(&mut self.current, next);
        self.undo_stack.push_back(redone);
        Ok(&self.current)
    }
}
