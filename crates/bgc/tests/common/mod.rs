//! Test Utilities for the BGC integration suite
//!
//! Concrete Bob value types (the core itself defines none) plus a fixture
//! bundling a heap and a collector.

#![allow(dead_code)]

use bgc::{
    expect_peer, CollectionReport, Collector, GcConfig, GcReason, Handle, Heap, Object,
    RootProvider, Tracer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// ============================================================================
/// VALUE TYPES
/// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Number(pub f64);

impl Object for Number {
    fn repr(&self, _heap: &Heap) -> String {
        self.0.to_string()
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.0 == expect_peer::<Self>(other).0
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

#[derive(Debug, Clone)]
pub struct Symbol(pub String);

impl Object for Symbol {
    fn repr(&self, _heap: &Heap) -> String {
        self.0.clone()
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.0 == expect_peer::<Self>(other).0
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}

    fn heap_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.capacity()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Boolean(pub bool);

impl Object for Boolean {
    fn repr(&self, _heap: &Heap) -> String {
        let text = if self.0 { "#t" } else { "#f" };
        text.to_string()
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.0 == expect_peer::<Self>(other).0
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

#[derive(Debug, Clone, Copy)]
pub struct Nil;

impl Object for Nil {
    fn repr(&self, _heap: &Heap) -> String {
        "()".to_string()
    }

    fn equals_to(&self, _other: &dyn Object, _heap: &Heap) -> bool {
        true
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

/// Cons cell
#[derive(Debug, Clone, Copy)]
pub struct Pair {
    pub car: Handle,
    pub cdr: Handle,
}

impl Object for Pair {
    fn repr(&self, heap: &Heap) -> String {
        format!("({} . {})", heap.repr(self.car), heap.repr(self.cdr))
    }

    fn equals_to(&self, other: &dyn Object, heap: &Heap) -> bool {
        let other = expect_peer::<Self>(other);
        matches!(heap.equal(self.car, other.car), Ok(true))
            && matches!(heap.equal(self.cdr, other.cdr), Ok(true))
    }

    fn mark_children(&self, tracer: &mut Tracer) {
        tracer.mark(self.car);
        tracer.mark(self.cdr);
    }
}

/// Vector of arbitrary references
#[derive(Debug, Clone, Default)]
pub struct Vector(pub Vec<Handle>);

impl Object for Vector {
    fn repr(&self, heap: &Heap) -> String {
        let items: Vec<String> = self.0.iter().map(|h| heap.repr(*h)).collect();
        format!("#({})", items.join(" "))
    }

    fn equals_to(&self, other: &dyn Object, heap: &Heap) -> bool {
        let other = expect_peer::<Self>(other);
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| matches!(heap.equal(*a, *b), Ok(true)))
    }

    fn mark_children(&self, tracer: &mut Tracer) {
        tracer.mark_all(self.0.iter().copied());
    }

    fn heap_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.0.capacity() * std::mem::size_of::<Handle>()
    }
}

/// Leaf that counts how often it was dropped
pub struct Resource {
    pub id: usize,
    drops: Arc<AtomicUsize>,
}

impl Resource {
    pub fn new(id: usize, drops: &Arc<AtomicUsize>) -> Self {
        Self {
            id,
            drops: Arc::clone(drops),
        }
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl Object for Resource {
    fn repr(&self, _heap: &Heap) -> String {
        format!("#<resource {}>", self.id)
    }

    fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
        self.id == expect_peer::<Self>(other).id
    }

    fn mark_children(&self, _tracer: &mut Tracer) {}
}

/// ============================================================================
/// GC FIXTURE
/// ============================================================================

/// A heap and a collector sharing one configuration
pub struct GcFixture {
    pub heap: Heap,
    pub collector: Collector,
}

impl GcFixture {
    pub fn with_defaults() -> Self {
        Self::with_config(GcConfig {
            verify_invariants: true,
            ..Default::default()
        })
    }

    /// Fixture whose heap refuses to hold more than `bytes` live bytes
    pub fn with_heap_limit(bytes: usize) -> Self {
        Self::with_config(GcConfig {
            max_heap_size: Some(bytes),
            verify_invariants: true,
            ..Default::default()
        })
    }

    pub fn with_config(config: GcConfig) -> Self {
        let heap = Heap::new(config.clone()).expect("fixture config must be valid");
        Self {
            heap,
            collector: Collector::new(config),
        }
    }

    /// Explicit collection that must succeed
    pub fn collect<R: RootProvider + ?Sized>(&mut self, roots: &R) -> CollectionReport {
        self.collector
            .collect(&mut self.heap, roots, GcReason::Explicit)
            .expect("collection should succeed")
    }

    pub fn number(&mut self, value: f64) -> Handle {
        self.heap.allocate(Number(value)).expect("allocate number")
    }

    pub fn symbol(&mut self, name: &str) -> Handle {
        self.heap
            .allocate(Symbol(name.to_string()))
            .expect("allocate symbol")
    }

    pub fn cons(&mut self, car: Handle, cdr: Handle) -> Handle {
        self.heap.allocate(Pair { car, cdr }).expect("allocate pair")
    }

    /// Proper list of the given elements, terminated by a fresh Nil
    pub fn list(&mut self, items: &[Handle]) -> Handle {
        let mut tail = self.heap.allocate(Nil).expect("allocate nil");
        for item in items.iter().rev() {
            tail = self.cons(*item, tail);
        }
        tail
    }

    pub fn set_cdr(&mut self, pair: Handle, cdr: Handle) {
        self.heap
            .get_as_mut::<Pair>(pair)
            .expect("set_cdr target must be a live pair")
            .cdr = cdr;
    }

    /// Assert that no object is left marked
    pub fn assert_idle(&self) {
        assert_eq!(
            self.heap.marked_count(),
            0,
            "mark bits left set after collection"
        );
        assert_eq!(self.collector.state(), bgc::GcState::Idle);
    }
}

pub fn drop_counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

pub fn drops(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
