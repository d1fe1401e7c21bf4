//! Marker Module - Reachability marking
//!
//! Marking starts from the root set and follows every reference reported by
//! `Object::mark_children`, setting the mark bit of each object reached.
//!
//! Marking Algorithm:
//! - Roots are pushed onto a [`MarkStack`] through a [`Tracer`]
//! - Each popped handle is marked if its bit is clear, then its children
//!   are pushed
//! - Handles already marked are skipped, so cycles terminate
//!
//! No recursion is involved: depth of the object graph only affects the
//! size of the work-list.

pub mod mark_queue;
pub mod roots;

pub use mark_queue::{MarkQueueStats, MarkStack};
pub use roots::{RootDescriptor, RootHandle, RootProvider, RootSet, RootStats, RootType};

use crate::heap::Heap;
use crate::object::Handle;

/// Tracer - collects references for the mark phase
///
/// Handed to `RootProvider::trace_roots` and `Object::mark_children`.
/// Reporting a handle only queues it; nothing is marked until the marker
/// pops it, so reporting the same handle twice is harmless.
pub struct Tracer<'w> {
    worklist: &'w mut MarkStack,
}

impl<'w> Tracer<'w> {
    pub(crate) fn new(worklist: &'w mut MarkStack) -> Self {
        Self { worklist }
    }

    /// Report one reference
    #[inline]
    pub fn mark(&mut self, handle: Handle) {
        self.worklist.push(handle);
    }

    /// Report every reference yielded by `handles`
    pub fn mark_all<I>(&mut self, handles: I)
    where
        I: IntoIterator<Item = Handle>,
    {
        for handle in handles {
            self.worklist.push(handle);
        }
    }
}

/// Result of one mark phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkStats {
    /// Handles reported by the root provider
    pub roots: usize,
    /// Objects whose mark bit was set
    pub marked: usize,
    /// Handles that no longer named a live object
    pub stale: Vec<Handle>,
    /// Work-list activity
    pub queue: MarkQueueStats,
}

/// Marker - drives the mark phase
///
/// Owns the work-list so its allocation is reused across cycles.
#[derive(Debug, Default)]
pub struct Marker {
    stack: MarkStack,
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every object reachable from `roots`
    ///
    /// Stale handles are skipped and returned in [`MarkStats::stale`]; a
    /// stale handle means a root provider or `mark_children` reported an
    /// object that was already reclaimed.
    pub fn mark<R>(&mut self, heap: &mut Heap, roots: &R) -> MarkStats
    where
        R: RootProvider + ?Sized,
    {
        self.stack.reset();
        roots.trace_roots(&mut Tracer::new(&mut self.stack));

        let mut stats = MarkStats {
            roots: self.stack.enqueued_count(),
            ..MarkStats::default()
        };

        while let Some(handle) = self.stack.pop() {
            match heap.try_mark(handle) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => {
                    log::warn!("stale reference {} reached during marking", handle);
                    stats.stale.push(handle);
                    continue;
                }
            }
            stats.marked += 1;

            if let Ok(object) = heap.get(handle) {
                object.mark_children(&mut Tracer::new(&mut self.stack));
            }
        }

        stats.queue = self.stack.stats();
        log::trace!(
            "marked {} objects from {} roots ({})",
            stats.marked,
            stats.roots,
            stats.queue
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::testing::{link, Node, Num};

    #[test]
    fn test_marks_reachable_only() {
        let mut heap = Heap::default();
        let a = heap.allocate(Node::default()).unwrap();
        let b = heap.allocate(Num(1)).unwrap();
        let c = heap.allocate(Num(2)).unwrap();
        link(&mut heap, a, b);

        let stats = Marker::new().mark(&mut heap, &a);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.marked, 2);
        assert!(heap.is_marked(a).unwrap());
        assert!(heap.is_marked(b).unwrap());
        assert!(!heap.is_marked(c).unwrap());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut heap = Heap::default();
        let a = heap.allocate(Node::default()).unwrap();
        let b = heap.allocate(Node::linked(&[a])).unwrap();
        link(&mut heap, a, b);
        link(&mut heap, a, a);

        let stats = Marker::new().mark(&mut heap, &[a, b]);
        assert_eq!(stats.marked, 2);
        assert_eq!(heap.marked_count(), 2);
    }

    #[test]
    fn test_stale_root_skipped() {
        let mut heap = Heap::default();
        let a = heap.allocate(Num(1)).unwrap();
        let b = heap.allocate(Num(2)).unwrap();
        heap.release(a).unwrap();

        let stats = Marker::new().mark(&mut heap, &[a, b]);
        assert_eq!(stats.stale, vec![a]);
        assert_eq!(stats.marked, 1);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut heap = Heap::default();
        let mut head = heap.allocate(Node::default()).unwrap();
        for _ in 0..50_000 {
            head = heap.allocate(Node::linked(&[head])).unwrap();
        }

        let stats = Marker::new().mark(&mut heap, &head);
        assert_eq!(stats.marked, 50_001);
        assert_eq!(stats.queue.pending, 0);
    }

    #[test]
    fn test_tracer_mark_all() {
        let mut stack = MarkStack::new();
        let mut tracer = Tracer::new(&mut stack);
        tracer.mark_all((0..3).map(|i| Handle::new(i, 0)));
        tracer.mark(Handle::new(9, 0));
        assert_eq!(stack.len(), 4);
    }
}
