//! Undo/redo over full-document snapshots.
//!
//! Every mutating editor action calls [`History::save_state`] right before it
//! touches the document. Entries are MessagePack-encoded
//! [`DocumentState`](quire_core::DocumentState)s, so an undo restores the
//! trees and the current page together. The id counter is the exception: it
//! keeps its newest value so ids from an undone branch are never minted
//! again.

use quire_core::Document;
use std::collections::VecDeque;

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Vec<u8>>,
    redo_stack: Vec<Vec<u8>>,
    /// Maximum undo depth; the oldest entry is evicted beyond it.
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a snapshot of `doc` and drop any redo entries.
    ///
    /// Returns `false` (and records nothing) if the document could not be
    /// encoded.
    pub fn save_state(&mut self, doc: &Document) -> bool {
        let Some(bytes) = encode(doc) else {
            return false;
        };
        self.push_undo(bytes);
        self.redo_stack.clear();
        true
    }

    /// Restore the most recent snapshot. The current state moves to the
    /// redo stack. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        let Some(current) = encode(doc) else {
            self.undo_stack.push_back(entry);
            return false;
        };
        let counter = doc.ids.counter();
        if let Err(err) = doc.restore_snapshot(&entry) {
            log::error!("undo snapshot could not be restored: {err}");
            self.undo_stack.push_back(entry);
            return false;
        }
        doc.ids.advance_to(counter);
        self.redo_stack.push(current);
        true
    }

    /// Re-apply the most recently undone state. The current state moves back
    /// onto the undo stack. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        let Some(current) = encode(doc) else {
            self.redo_stack.push(entry);
            return false;
        };
        let counter = doc.ids.counter();
        if let Err(err) = doc.restore_snapshot(&entry) {
            log::error!("redo snapshot could not be restored: {err}");
            self.redo_stack.push(entry);
            return false;
        }
        doc.ids.advance_to(counter);
        self.push_undo(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, bytes: Vec<u8>) {
        self.undo_stack.push_back(bytes);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

fn encode(doc: &Document) -> Option<Vec<u8>> {
    match doc.snapshot() {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::error!("document snapshot failed: {err}");
            None
        }
    }
}
