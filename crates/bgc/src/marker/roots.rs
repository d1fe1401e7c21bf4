//! Root Set - Starting points for marking
//!
//! Roots are the references the interpreter holds outside the heap: values
//! on its evaluation stack, variables in live environments, globals. Every
//! object reachable from a root survives a collection.
//!
//! # Root Providers
//!
//! The collector asks a [`RootProvider`] to report its roots for each cycle.
//! Plain handles and containers of handles are providers already, so an
//! interpreter can pass its stack slice directly. [`RootSet`] is a registry
//! for roots that outlive a single call, such as globals or values pinned
//! by native code.
//!
//! A root set that misses a reference causes that object to be reclaimed
//! while still in use. The heap detects the later access as a stale handle.

use super::Tracer;
use crate::error::{BgcError, Result};
use crate::object::Handle;
use indexmap::IndexMap;

/// Source of roots for one collection
pub trait RootProvider {
    /// Report every root to the tracer
    fn trace_roots(&self, tracer: &mut Tracer);
}

impl RootProvider for Handle {
    fn trace_roots(&self, tracer: &mut Tracer) {
        tracer.mark(*self);
    }
}

impl RootProvider for Option<Handle> {
    fn trace_roots(&self, tracer: &mut Tracer) {
        if let Some(handle) = self {
            tracer.mark(*handle);
        }
    }
}

impl<T: RootProvider> RootProvider for [T] {
    fn trace_roots(&self, tracer: &mut Tracer) {
        for root in self {
            root.trace_roots(tracer);
        }
    }
}

impl<T: RootProvider, const N: usize> RootProvider for [T; N] {
    fn trace_roots(&self, tracer: &mut Tracer) {
        self.as_slice().trace_roots(tracer);
    }
}

impl<T: RootProvider> RootProvider for Vec<T> {
    fn trace_roots(&self, tracer: &mut Tracer) {
        self.as_slice().trace_roots(tracer);
    }
}

impl<T: RootProvider + ?Sized> RootProvider for &T {
    fn trace_roots(&self, tracer: &mut Tracer) {
        (**self).trace_roots(tracer);
    }
}

impl<A: RootProvider, B: RootProvider> RootProvider for (A, B) {
    fn trace_roots(&self, tracer: &mut Tracer) {
        self.0.trace_roots(tracer);
        self.1.trace_roots(tracer);
    }
}

impl<A: RootProvider, B: RootProvider, C: RootProvider> RootProvider for (A, B, C) {
    fn trace_roots(&self, tracer: &mut Tracer) {
        self.0.trace_roots(tracer);
        self.1.trace_roots(tracer);
        self.2.trace_roots(tracer);
    }
}

/// Root types for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootType {
    /// Evaluation stack slots
    Stack,
    /// Variables of live environments
    Environment,
    /// Global bindings
    Global,
    /// Objects pinned by native code
    Pinned,
}

impl std::fmt::Display for RootType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootType::Stack => write!(f, "Stack"),
            RootType::Environment => write!(f, "Environment"),
            RootType::Global => write!(f, "Global"),
            RootType::Pinned => write!(f, "Pinned"),
        }
    }
}

/// Root descriptor - a single registered root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDescriptor {
    /// Object kept alive by this root
    pub handle: Handle,
    /// Root type
    pub root_type: RootType,
    /// Optional name for debugging
    pub name: Option<String>,
    /// Registry id
    pub root_id: usize,
}

/// Ticket returned by [`RootSet::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootHandle {
    id: usize,
}

impl RootHandle {
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Root statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RootStats {
    /// Total registered roots
    pub total_roots: usize,
    pub stack_roots: usize,
    pub environment_roots: usize,
    pub global_roots: usize,
    pub pinned_roots: usize,
}

impl std::fmt::Display for RootStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RootStats {{ total: {}, stack: {}, environment: {}, global: {}, pinned: {} }}",
            self.total_roots,
            self.stack_roots,
            self.environment_roots,
            self.global_roots,
            self.pinned_roots
        )
    }
}

/// RootSet - registry of long-lived roots
///
/// Roots are kept in registration order, which is also the order they are
/// reported to the tracer.
#[derive(Debug, Default)]
pub struct RootSet {
    roots: IndexMap<usize, RootDescriptor>,
    next_id: usize,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` as a root
    pub fn register(&mut self, handle: Handle, root_type: RootType, name: Option<&str>) -> RootHandle {
        let root_id = self.next_id;
        self.next_id += 1;

        self.roots.insert(
            root_id,
            RootDescriptor {
                handle,
                root_type,
                name: name.map(|s| s.to_string()),
                root_id,
            },
        );

        log::trace!("registered {} root {} -> {}", root_type, root_id, handle);
        RootHandle { id: root_id }
    }

    pub fn register_stack_root(&mut self, handle: Handle, name: Option<&str>) -> RootHandle {
        self.register(handle, RootType::Stack, name)
    }

    pub fn register_global_root(&mut self, handle: Handle, name: Option<&str>) -> RootHandle {
        self.register(handle, RootType::Global, name)
    }

    /// Remove a root
    ///
    /// # Errors
    /// `UnknownRoot` if the root was never registered or already removed.
    pub fn unregister(&mut self, root: RootHandle) -> Result<RootDescriptor> {
        self.roots
            .shift_remove(&root.id)
            .ok_or(BgcError::UnknownRoot(root.id))
    }

    /// Point an existing root at another object
    pub fn update(&mut self, root: RootHandle, handle: Handle) -> Result<()> {
        let descriptor = self
            .roots
            .get_mut(&root.id)
            .ok_or(BgcError::UnknownRoot(root.id))?;
        descriptor.handle = handle;
        Ok(())
    }

    pub fn get(&self, root: RootHandle) -> Option<&RootDescriptor> {
        self.roots.get(&root.id)
    }

    pub fn contains(&self, root: RootHandle) -> bool {
        self.roots.contains_key(&root.id)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Registered roots in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RootDescriptor> + '_ {
        self.roots.values()
    }

    /// Handles of every root of the given type
    pub fn handles_of(&self, root_type: RootType) -> Vec<Handle> {
        self.iter()
            .filter(|root| root.root_type == root_type)
            .map(|root| root.handle)
            .collect()
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn stats(&self) -> RootStats {
        let mut stats = RootStats {
            total_roots: self.roots.len(),
            ..RootStats::default()
        };

        for root in self.roots.values() {
            match root.root_type {
                RootType::Stack => stats.stack_roots += 1,
                RootType::Environment => stats.environment_roots += 1,
                RootType::Global => stats.global_roots += 1,
                RootType::Pinned => stats.pinned_roots += 1,
            }
        }

        stats
    }
}

impl RootProvider for RootSet {
    fn trace_roots(&self, tracer: &mut Tracer) {
        tracer.mark_all(self.roots.values().map(|root| root.handle));
    }
}

#[cfg(test)]
mod tests {
    use super::super::MarkStack;
    use super::*;

    fn traced<R: RootProvider + ?Sized>(roots: &R) -> Vec<Handle> {
        let mut stack = MarkStack::new();
        roots.trace_roots(&mut Tracer::new(&mut stack));
        let mut handles = Vec::new();
        while let Some(handle) = stack.pop() {
            handles.push(handle);
        }
        handles.reverse();
        handles
    }

    #[test]
    fn test_register_unregister() {
        let mut set = RootSet::new();
        let root = set.register(Handle::new(1, 0), RootType::Global, Some("main"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(root).and_then(|r| r.name.as_deref()), Some("main"));

        let removed = set.unregister(root).unwrap();
        assert_eq!(removed.handle, Handle::new(1, 0));
        assert!(set.is_empty());
        assert!(matches!(
            set.unregister(root),
            Err(BgcError::UnknownRoot(id)) if id == root.id()
        ));
    }

    #[test]
    fn test_ids_not_reused() {
        let mut set = RootSet::new();
        let a = set.register_stack_root(Handle::new(1, 0), None);
        set.unregister(a).unwrap();
        let b = set.register_stack_root(Handle::new(1, 0), None);
        assert_ne!(a, b);
        assert!(!set.contains(a));
    }

    #[test]
    fn test_update_root() {
        let mut set = RootSet::new();
        let root = set.register_global_root(Handle::new(1, 0), None);
        set.update(root, Handle::new(2, 0)).unwrap();

        assert_eq!(traced(&set), vec![Handle::new(2, 0)]);
        set.unregister(root).unwrap();
        assert!(set.update(root, Handle::new(3, 0)).is_err());
    }

    #[test]
    fn test_stats_per_type() {
        let mut set = RootSet::new();
        set.register(Handle::new(0, 0), RootType::Stack, None);
        set.register(Handle::new(1, 0), RootType::Stack, None);
        set.register(Handle::new(2, 0), RootType::Environment, None);
        set.register(Handle::new(3, 0), RootType::Pinned, None);

        let stats = set.stats();
        assert_eq!(stats.total_roots, 4);
        assert_eq!(stats.stack_roots, 2);
        assert_eq!(stats.environment_roots, 1);
        assert_eq!(stats.global_roots, 0);
        assert_eq!(stats.pinned_roots, 1);
        assert_eq!(
            set.handles_of(RootType::Stack),
            vec![Handle::new(0, 0), Handle::new(1, 0)]
        );
    }

    #[test]
    fn test_provider_impls() {
        let a = Handle::new(0, 0);
        let b = Handle::new(1, 0);
        let c = Handle::new(2, 0);

        assert_eq!(traced(&a), vec![a]);
        assert_eq!(traced(&None::<Handle>), Vec::<Handle>::new());
        assert_eq!(traced(&Some(b)), vec![b]);
        assert_eq!(traced(&[a, b]), vec![a, b]);
        assert_eq!(traced(&vec![c]), vec![c]);
        assert_eq!(traced(&(a, vec![b, c])), vec![a, b, c]);
        assert_eq!(traced(&(a, Some(b), [c])), vec![a, b, c]);
        assert_eq!(traced(&[a, b][..]), vec![a, b]);
    }
}
