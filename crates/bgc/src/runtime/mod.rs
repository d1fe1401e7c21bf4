//! Runtime Module - Heap, collector and pinned roots in one place
//!
//! [`Runtime`] is what an interpreter embeds: it owns the heap, the
//! collector and a registry of long-lived roots, and adds the roots the
//! interpreter passes per call (its evaluation stack, live frames) on top.
//!
//! A process-wide instance is available through [`global`].

pub mod global;

pub use global::{reset_global, with_global};

use crate::config::GcConfig;
use crate::error::{BgcError, Result};
use crate::gc::{CollectionReport, Collector, GcReason};
use crate::heap::Heap;
use crate::marker::{RootHandle, RootProvider, RootSet, RootType};
use crate::object::{Handle, Object};
use indexmap::IndexMap;

/// Runtime lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// Accepting allocations
    Running,
    /// Shut down; every object has been released
    Stopped,
}

impl std::fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeState::Running => write!(f, "Running"),
            RuntimeState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Runtime - heap plus collector plus pinned roots
pub struct Runtime {
    heap: Heap,
    collector: Collector,
    pinned: RootSet,
    state: RuntimeState,
}

impl Runtime {
    /// Create new runtime
    ///
    /// # Errors
    /// `Configuration` if `config` does not validate.
    pub fn new(config: GcConfig) -> Result<Self> {
        let heap = Heap::new(config.clone())?;
        log::debug!(
            "runtime started (max heap: {:?}, initial capacity: {})",
            config.max_heap_size,
            config.initial_capacity
        );

        Ok(Self {
            heap,
            collector: Collector::new(config),
            pinned: RootSet::new(),
            state: RuntimeState::Running,
        })
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state != RuntimeState::Running {
            return Err(BgcError::InvalidState {
                expected: RuntimeState::Running.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Allocate an object on the runtime's heap
    ///
    /// Does not collect on failure; on `OutOfMemory` the caller decides
    /// whether to `collect` and retry.
    pub fn allocate<T: Object>(&mut self, object: T) -> Result<Handle> {
        self.ensure_running()?;
        self.heap.allocate(object)
    }

    /// Keep `handle` alive until unpinned
    pub fn pin(&mut self, handle: Handle, root_type: RootType, name: Option<&str>) -> Result<RootHandle> {
        if !self.heap.contains(handle) {
            return Err(BgcError::stale(handle));
        }
        Ok(self.pinned.register(handle, root_type, name))
    }

    /// Drop a root created by [`pin`](Runtime::pin)
    pub fn unpin(&mut self, root: RootHandle) -> Result<()> {
        self.pinned.unregister(root).map(|_| ())
    }

    /// Run a collection with the pinned roots plus `extra_roots`
    pub fn collect<R>(&mut self, reason: GcReason, extra_roots: &R) -> Result<CollectionReport>
    where
        R: RootProvider + ?Sized,
    {
        self.ensure_running()?;
        let roots = (&self.pinned, extra_roots);
        self.collector.collect(&mut self.heap, &roots, reason)
    }

    /// Release everything and stop accepting allocations
    ///
    /// Runs a final collection with no roots, so every finalizer runs.
    pub fn shutdown(&mut self) -> Result<CollectionReport> {
        self.ensure_running()?;
        self.pinned.clear();

        let report = self
            .collector
            .collect(&mut self.heap, &None::<Handle>, GcReason::Shutdown)?;
        self.state = RuntimeState::Stopped;

        log::debug!("runtime stopped: {}", report);
        Ok(report)
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Pinned roots
    pub fn roots(&self) -> &RootSet {
        &self.pinned
    }

    /// See [`Heap::stats_summary`]
    pub fn stats_summary(&self) -> String {
        self.heap.stats_summary()
    }

    /// See [`Heap::stats_dump`]
    pub fn stats_dump(&self) -> String {
        self.heap.stats_dump()
    }

    /// Heap, collector and root diagnostics, prefixed by component
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut diagnostics = IndexMap::new();

        diagnostics.insert("runtime.state".to_string(), self.state.to_string());
        for (key, value) in self.heap.diagnostics() {
            diagnostics.insert(format!("heap.{}", key), value);
        }
        for (key, value) in self.collector.diagnostics() {
            diagnostics.insert(format!("gc.{}", key), value);
        }
        diagnostics.insert("roots.pinned".to_string(), self.pinned.stats().to_string());

        diagnostics
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            heap: Heap::default(),
            collector: Collector::default(),
            pinned: RootSet::new(),
            state: RuntimeState::Running,
        }
    }
}
