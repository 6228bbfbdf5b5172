// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded undo stack of full-surface snapshots.

use std::collections::VecDeque;

use image::RgbaImage;
use tracing::trace;

/// Snapshots taken before each mutating operation, newest last.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<RgbaImage>,
    limit: usize,
}

impl UndoStack {
    /// A stack holding at most `limit` snapshots (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Push a snapshot, dropping the oldest when full.
    pub fn push(&mut self, snapshot: RgbaImage) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            trace!(limit = self.limit, "oldest undo entry dropped");
        }
    }

    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn snapshot(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, Rgba([value; 4]))
    }

    #[test]
    fn pops_newest_first() {
        let mut stack = UndoStack::new(10);
        stack.push(snapshot(1));
        stack.push(snapshot(2));
        assert_eq!(stack.pop(), Some(snapshot(2)));
        assert_eq!(stack.pop(), Some(snapshot(1)));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn oldest_entry_is_dropped_at_limit() {
        let mut stack = UndoStack::new(2);
        for value in 1..=3 {
            stack.push(snapshot(value));
        }
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(snapshot(3)));
        assert_eq!(stack.pop(), Some(snapshot(2)));
        assert!(stack.is_empty());
    }
}
