//! Bounded snapshot stacks for undo/redo.

use std::collections::VecDeque;

use crate::raster::PixelBuffer;

/// A LIFO stack of canvas snapshots that evicts its oldest entry once
/// `capacity` is reached.
#[derive(Debug, Clone)]
pub struct SnapshotStack {
    entries: VecDeque<PixelBuffer>,
    capacity: usize,
}

impl SnapshotStack {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot. Returns true if the oldest entry was evicted.
    pub fn push(&mut self, snapshot: PixelBuffer) -> bool {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front();
            true
        } else {
            false
        };
        self.entries.push_back(snapshot);
        evicted
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<PixelBuffer> {
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

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
