//! Mark Stack - Work-list for the mark phase
//!
//! Handles waiting to be marked are kept on an explicit stack instead of the
//! native call stack, so marking a long chain of objects costs heap memory,
//! not recursion depth. LIFO order keeps the traversal depth-first.

use crate::object::Handle;

/// MarkStack - LIFO work-list of handles to mark
#[derive(Debug, Default)]
pub struct MarkStack {
    items: Vec<Handle>,
    enqueued_count: usize,
    processed_count: usize,
}

impl MarkStack {
    /// Create new mark stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push handle onto the stack
    #[inline]
    pub fn push(&mut self, handle: Handle) {
        self.items.push(handle);
        self.enqueued_count += 1;
    }

    /// Pop the most recently pushed handle
    #[inline]
    pub fn pop(&mut self) -> Option<Handle> {
        let handle = self.items.pop();
        if handle.is_some() {
            self.processed_count += 1;
        }
        handle
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop pending work and reset counters, keeping the allocation
    pub fn reset(&mut self) {
        self.items.clear();
        self.enqueued_count = 0;
        self.processed_count = 0;
    }

    /// Handles pushed since the last reset
    pub fn enqueued_count(&self) -> usize {
        self.enqueued_count
    }

    /// Handles popped since the last reset
    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    /// Get statistics
    pub fn stats(&self) -> MarkQueueStats {
        MarkQueueStats {
            enqueued: self.enqueued_count,
            processed: self.processed_count,
            pending: self.items.len(),
        }
    }
}

/// Mark stack statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkQueueStats {
    pub enqueued: usize,
    pub processed: usize,
    pub pending: usize,
}

impl std::fmt::Display for MarkQueueStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MarkQueue {{ enqueued: {}, processed: {}, pending: {} }}",
            self.enqueued, self.processed, self.pending
        )
    }
}
