//! Small concrete object types for unit tests.

use super::{expect_peer, Handle, Object};
use crate::heap::Heap;
use crate::marker::Tracer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct Num(pub i64);

impl Object for Num {
    fn repr(&self, _heap: &Heap) -> String {
        self.0.to_string()
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.0 == expect_peer::<Self>(other).0
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

#[derive(Debug)]
pub(crate) struct Sym(pub String);

impl Object for Sym {
    fn repr(&self, _heap: &Heap) -> String {
        self.0.clone()
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.0 == expect_peer::<Self>(other).0
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

/// Node with an arbitrary number of outgoing references.
#[derive(Debug, Default)]
pub(crate) struct Node {
    pub children: Vec<Handle>,
}

impl Node {
    pub fn linked(children: &[Handle]) -> Self {
        Self {
            children: children.to_vec(),
        }
    }
}

impl Object for Node {
    fn repr(&self, _heap: &Heap) -> String {
        format!("#<node {}>", self.children.len())
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.children == expect_peer::<Self>(other).children
    }

    fn mark_children(&self, tracer: &mut Tracer) {
        tracer.mark_all(self.children.iter().copied());
    }
}

/// Leaf that counts how many times it was dropped.
pub(crate) struct Tracked(pub Arc<AtomicUsize>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl Object for Tracked {
    fn repr(&self, _heap: &Heap) -> String {
        "#<tracked>".to_string()
    }

    fn equals_to(&self, _other: &dyn Object, _heap: &Heap) -> bool {
        false
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

/// Link `from` to `to` by appending a child reference.
pub(crate) fn link(heap: &mut Heap, from: Handle, to: Handle) {
    heap.get_as_mut::<Node>(from)
        .expect("link source must be a live Node")
        .children
        .push(to);
}
