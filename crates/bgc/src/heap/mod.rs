//! Heap Module - The allocator and its live set
//!
//! The heap is the sole owner of every object's storage. It registers
//! objects on allocation, releases them on request (normally from the
//! sweep), and keeps the accounting used by diagnostics.
//!
//! Accounting:
//! - `total_allocated` - bytes allocated since the heap was created.
//!   Monotonic; releasing an object never decreases it.
//! - `live_bytes` - bytes held by objects currently in the live set. This is
//!   what `max_heap_size` is checked against.
//!
//! Access discipline: every mutating operation takes `&mut self`. A heap
//! shared between threads must sit behind one lock for the duration of each
//! registration, removal and collection (see `runtime::global`).

pub mod finalizer;
mod slot;

pub use finalizer::FinalizerFn;

use crate::config::GcConfig;
use crate::error::{BgcError, Result};
use crate::object::{objects_equal, Handle, Object};
use finalizer::FinalizerTable;
use indexmap::IndexMap;
use slot::{Slot, SlotTable};

/// Heap - allocator and live-set registry
///
/// # Examples
///
/// ```rust
/// use bgc::{expect_peer, Heap, Object, Tracer};
///
/// struct Number(f64);
///
/// impl Object for Number {
///     fn repr(&self, _heap: &Heap) -> String {
///         self.0.to_string()
///     }
///     fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
///         self.0 == expect_peer::<Self>(other).0
///     }
///     fn mark_children(&self, _tracer: &mut Tracer) {}
/// }
///
/// let mut heap = Heap::default();
/// let n = heap.allocate(Number(1.5))?;
/// assert_eq!(heap.len(), 1);
/// assert_eq!(heap.repr(n), "1.5");
/// # Ok::<(), bgc::BgcError>(())
/// ```
pub struct Heap {
    slots: SlotTable,
    finalizers: FinalizerTable,
    config: GcConfig,
    total_allocated: usize,
    live_bytes: usize,
    allocation_count: u64,
    released_count: u64,
}

impl Heap {
    /// Create a heap with the given configuration
    ///
    /// # Errors
    /// `Configuration` if the configuration does not validate.
    pub fn new(config: GcConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: GcConfig) -> Self {
        Self {
            slots: SlotTable::with_capacity(config.initial_capacity),
            finalizers: FinalizerTable::new(),
            config,
            total_allocated: 0,
            live_bytes: 0,
            allocation_count: 0,
            released_count: 0,
        }
    }

    /// Allocate `object` on the heap and register it in the live set
    ///
    /// Charges `object.heap_size()` bytes to the accounting.
    ///
    /// # Errors
    /// `OutOfMemory` when the allocation would exceed `max_heap_size` or
    /// the live set cannot grow. The object is dropped in that case.
    pub fn allocate<T: Object>(&mut self, object: T) -> Result<Handle> {
        let size = object.heap_size();

        if let Some(limit) = self.config.max_heap_size {
            let available = limit.saturating_sub(self.live_bytes);
            if size > available {
                log::warn!(
                    "allocation of {} bytes refused: {} of {} bytes live",
                    size,
                    self.live_bytes,
                    limit
                );
                return Err(BgcError::OutOfMemory {
                    requested: size,
                    available,
                });
            }
        }

        let handle = self
            .slots
            .insert(Slot::new(Box::new(object), size))
            .ok_or(BgcError::OutOfMemory {
                requested: size,
                available: 0,
            })?;

        self.live_bytes += size;
        self.total_allocated += size;
        self.allocation_count += 1;

        log::trace!("allocated {} ({} bytes)", handle, size);
        Ok(handle)
    }

    /// Remove `handle` from the live set and free its storage
    ///
    /// Runs the registered finalizer (if any), then drops the object.
    /// Returns the number of bytes released.
    ///
    /// # Errors
    /// `StaleHandle` if the object was already released.
    pub fn release(&mut self, handle: Handle) -> Result<usize> {
        let mut slot = self
            .slots
            .remove(handle)
            .ok_or_else(|| BgcError::stale(handle))?;

        self.live_bytes -= slot.size;
        self.released_count += 1;

        if let Some(finalizer) = self.finalizers.take(handle) {
            finalizer(slot.object.as_mut());
        }

        log::trace!("released {} ({} bytes)", handle, slot.size);
        Ok(slot.size)
    }

    /// Register a finalizer that runs right before `handle` is dropped
    ///
    /// Replaces any finalizer registered earlier for the same object.
    pub fn register_finalizer<F>(&mut self, handle: Handle, finalizer: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Object) + Send + 'static,
    {
        if !self.contains(handle) {
            return Err(BgcError::stale(handle));
        }
        self.finalizers.register(handle, Box::new(finalizer));
        Ok(())
    }

    /// Resolve a handle
    pub fn get(&self, handle: Handle) -> Result<&dyn Object> {
        self.slots
            .get(handle)
            .map(|slot| slot.object.as_ref())
            .ok_or_else(|| BgcError::stale(handle))
    }

    /// Resolve a handle mutably
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut dyn Object> {
        self.slots
            .get_mut(handle)
            .map(|slot| slot.object.as_mut())
            .ok_or_else(|| BgcError::stale(handle))
    }

    /// Resolve a handle to a concrete type
    ///
    /// # Errors
    /// `StaleHandle` or `TypeMismatch`.
    pub fn get_as<T: Object>(&self, handle: Handle) -> Result<&T> {
        let object = self.get(handle)?;
        let actual = object.type_name();
        object
            .downcast_ref::<T>()
            .ok_or(BgcError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    /// Resolve a handle to a concrete type, mutably
    pub fn get_as_mut<T: Object>(&mut self, handle: Handle) -> Result<&mut T> {
        let object = self.get_mut(handle)?;
        let actual = object.type_name();
        object
            .downcast_mut::<T>()
            .ok_or(BgcError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    /// Check whether `handle` still names a live object
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.slots.get(handle).is_some()
    }

    /// Compare two objects through the equality relation
    ///
    /// Identical handles are equal without touching the objects' types.
    ///
    /// # Errors
    /// `StaleHandle` if either handle was released.
    pub fn equal(&self, a: Handle, b: Handle) -> Result<bool> {
        let lhs = self.get(a)?;
        if a == b {
            return Ok(true);
        }
        let rhs = self.get(b)?;
        Ok(objects_equal(self, lhs, rhs))
    }

    /// Representation of the object behind `handle`
    ///
    /// Released objects render as `#<reclaimed #index.generation>`.
    pub fn repr(&self, handle: Handle) -> String {
        match self.get(handle) {
            Ok(object) => object.repr(self),
            Err(_) => format!("#<reclaimed {}>", handle),
        }
    }

    /// Number of live objects
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the live set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    /// Handles of all live objects, in slot order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots.iter().map(|(handle, _)| handle)
    }

    /// Bytes allocated since the heap was created
    pub fn total_allocated(&self) -> usize {
        self.total_allocated
    }

    /// Bytes held by live objects
    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Number of successful allocations
    pub fn allocation_count(&self) -> u64 {
        self.allocation_count
    }

    /// Number of released objects
    pub fn released_count(&self) -> u64 {
        self.released_count
    }

    /// Heap configuration
    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Check the mark bit of a live object
    pub fn is_marked(&self, handle: Handle) -> Result<bool> {
        self.slots
            .get(handle)
            .map(|slot| slot.marked)
            .ok_or_else(|| BgcError::stale(handle))
    }

    /// Set the mark bit; `Ok(true)` if it was clear before
    pub(crate) fn try_mark(&mut self, handle: Handle) -> Result<bool> {
        let slot = self
            .slots
            .get_mut(handle)
            .ok_or_else(|| BgcError::stale(handle))?;
        let newly_marked = !slot.marked;
        slot.marked = true;
        Ok(newly_marked)
    }

    /// Clear the mark bit; returns whether it was set
    pub(crate) fn clear_mark(&mut self, handle: Handle) -> bool {
        match self.slots.get_mut(handle) {
            Some(slot) => std::mem::replace(&mut slot.marked, false),
            None => false,
        }
    }

    /// Number of live objects with the mark bit set
    pub fn marked_count(&self) -> usize {
        self.slots.iter().filter(|(_, slot)| slot.marked).count()
    }

    /// Live-object count and cumulative allocation, human readable
    pub fn stats_summary(&self) -> String {
        format!(
            "Number of live objects: {}\nTotal allocation size: {}\n",
            self.len(),
            self.total_allocated
        )
    }

    /// `repr()` of every live object, one per line
    ///
    /// Linear in the live-set size. Diagnostics only.
    pub fn stats_dump(&self) -> String {
        let mut dump = String::new();
        for (_, slot) in self.slots.iter() {
            dump.push_str(&slot.object.repr(self));
            dump.push('\n');
        }
        dump
    }

    /// Detailed diagnostic information
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut diagnostics = IndexMap::new();

        diagnostics.insert("live_objects".to_string(), self.len().to_string());
        diagnostics.insert("live_bytes".to_string(), self.live_bytes.to_string());
        diagnostics.insert(
            "total_allocated".to_string(),
            self.total_allocated.to_string(),
        );
        diagnostics.insert(
            "allocation_count".to_string(),
            self.allocation_count.to_string(),
        );
        diagnostics.insert(
            "released_count".to_string(),
            self.released_count.to_string(),
        );
        diagnostics.insert("slot_capacity".to_string(), self.slots.capacity().to_string());
        diagnostics.insert("free_slots".to_string(), self.slots.free_slots().to_string());
        diagnostics.insert("retired_slots".to_string(), self.slots.retired_slots().to_string());
        diagnostics.insert("finalizers".to_string(), self.finalizers.len().to_string());
        diagnostics.insert(
            "max_heap_size".to_string(),
            self.config
                .max_heap_size
                .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string()),
        );

        diagnostics
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::with_valid_config(GcConfig::default())
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        let remaining: Vec<Handle> = self.handles().collect();
        if !remaining.is_empty() {
            log::debug!("heap dropped with {} live objects", remaining.len());
        }
        for handle in remaining {
            let _ = self.release(handle);
        }
    }
}
