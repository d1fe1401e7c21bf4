//! Finalizer - Per-object cleanup hooks
//!
//! Types that own external resources normally clean up in `Drop`, which the
//! heap runs when it releases the object. Finalizers cover the remaining
//! case: cleanup decided by the interpreter for one particular object
//! (closing a port, unregistering a callback). A finalizer runs exactly
//! once, right before the object it belongs to is dropped.

use crate::object::{Handle, Object};
use indexmap::IndexMap;

/// Cleanup callback receiving the object about to be dropped
pub type FinalizerFn = Box<dyn FnOnce(&mut dyn Object) + Send>;

/// Finalizers keyed by the object they belong to
#[derive(Default)]
pub(crate) struct FinalizerTable {
    entries: IndexMap<Handle, FinalizerFn>,
}

impl FinalizerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finalizer, replacing any earlier one for `handle`
    pub fn register(&mut self, handle: Handle, finalizer: FinalizerFn) -> bool {
        self.entries.insert(handle, finalizer).is_some()
    }

    /// Remove and return the finalizer for `handle`
    pub fn take(&mut self, handle: Handle) -> Option<FinalizerFn> {
        self.entries.swap_remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
