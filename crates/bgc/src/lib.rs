//! # BGC - Object lifecycle core of the Bob VM
//!
//! BGC owns every heap value of the Bob interpreter: it defines the contract
//! heap values implement, allocates and tracks them, compares them, and
//! reclaims the ones the interpreter can no longer reach.
//!
//! ## Overview
//!
//! - **Object model**: heap values implement [`Object`] (`repr`,
//!   `equals_to`, `mark_children`) and are referenced through copyable,
//!   generation-checked [`Handle`]s.
//! - **Allocator**: [`Heap`] registers objects in its live set, keeps
//!   allocation statistics and releases objects exactly once.
//! - **Equality**: [`objects_equal`] / [`Heap::equal`] check identity, then
//!   the concrete type, then delegate to the type's `equals_to`.
//! - **Collector**: [`Collector`] runs stop-the-world mark-and-sweep cycles
//!   over an explicit work-list, so graph depth never grows the call stack.
//!
//! ## Quick Start
//!
//! ```rust
//! use bgc::{expect_peer, Collector, GcReason, Handle, Heap, Object, Tracer};
//!
//! struct Cons {
//!     car: Handle,
//!     cdr: Option<Handle>,
//! }
//!
//! struct Int(i64);
//!
//! impl Object for Int {
//!     fn repr(&self, _heap: &Heap) -> String {
//!         self.0.to_string()
//!     }
//!     fn equals_to(&self, other: &dyn Object, _heap: &Heap) -> bool {
//!         self.0 == expect_peer::<Self>(other).0
//!     }
//!     fn mark_children(&self, _tracer: &mut Tracer) {}
//! }
//!
//! impl Object for Cons {
//!     fn repr(&self, heap: &Heap) -> String {
//!         match self.cdr {
//!             Some(cdr) => format!("({} . {})", heap.repr(self.car), heap.repr(cdr)),
//!             None => format!("({})", heap.repr(self.car)),
//!         }
//!     }
//!     fn equals_to(&self, other: &dyn Object, heap: &Heap) -> bool {
//!         let other = expect_peer::<Self>(other);
//!         let cdr_equal = match (self.cdr, other.cdr) {
//!             (Some(a), Some(b)) => matches!(heap.equal(a, b), Ok(true)),
//!             (None, None) => true,
//!             _ => false,
//!         };
//!         cdr_equal && matches!(heap.equal(self.car, other.car), Ok(true))
//!     }
//!     fn mark_children(&self, tracer: &mut Tracer) {
//!         tracer.mark(self.car);
//!         if let Some(cdr) = self.cdr {
//!             tracer.mark(cdr);
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), bgc::BgcError> {
//!     let mut heap = Heap::default();
//!     let mut collector = Collector::default();
//!
//!     let one = heap.allocate(Int(1))?;
//!     let list = heap.allocate(Cons { car: one, cdr: None })?;
//!     let garbage = heap.allocate(Int(2))?;
//!     assert_eq!(heap.repr(list), "(1)");
//!
//!     // The interpreter's stack holds `list` only
//!     let stack = vec![list];
//!     let report = collector.collect(&mut heap, &stack, GcReason::Explicit)?;
//!
//!     assert_eq!(report.reclaimed_objects, 1);
//!     assert!(heap.contains(one));
//!     assert!(!heap.contains(garbage));
//!     Ok(())
//! }
//! ```
//!
//! ## GC Cycle
//!
//! ```text
//! ┌──────────┐  collect()  ┌───────────┐        ┌────────────┐
//! │   Idle   │ ──────────▶ │  Marking  │ ─────▶ │  Sweeping  │
//! │ no marks │             │ work-list │        │ clear/free │
//! └──────────┘ ◀────────── └───────────┘        └────────────┘
//!        ▲                                             │
//!        └─────────────────────────────────────────────┘
//! ```
//!
//! The collector never triggers itself. The interpreter calls `collect`
//! when its roots are complete, typically after `allocate` returned
//! [`BgcError::OutOfMemory`].
//!
//! ## Safety
//!
//! BGC contains no `unsafe` code. Premature reclamation caused by an
//! incomplete root set or a `mark_children` that misses a reference shows
//! up as [`BgcError::StaleHandle`] on the next access, never as a dangling
//! pointer.
//!
//! ### Thread Safety
//!
//! - `Heap`, `Collector` and `Runtime` are `Send`; every mutation takes
//!   `&mut self`
//! - The process-wide runtime ([`runtime::with_global`]) serializes all
//!   access behind one lock
//!
//! ## Modules
//!
//! - [`config`]: Heap and collector configuration
//! - [`error`]: Error types for all BGC operations
//! - [`gc`]: Mark-and-sweep cycle management
//! - [`heap`]: Allocator, live set and finalizers
//! - [`logging`]: Structured GC events
//! - [`marker`]: Marking work-list and root providers
//! - [`object`]: Object contract, handles and the equality relation
//! - [`runtime`]: Heap, collector and pinned roots bundled for embedding
//! - [`stats`]: Collection statistics

// Core GC modules
pub mod config;
pub mod error;
pub mod gc;

// Object model and storage
pub mod heap;
pub mod object;

// GC algorithm components
pub mod marker;

// Runtime and monitoring
pub mod logging;
pub mod runtime;
pub mod stats;

// Re-export main types for convenience
pub use config::GcConfig;
pub use error::{BgcError, Result};
pub use gc::{CollectionReport, Collector, GcReason, GcState};
pub use heap::Heap;
pub use marker::{RootHandle, RootProvider, RootSet, RootType, Tracer};
pub use object::{expect_peer, objects_equal, Handle, Object};
pub use runtime::Runtime;

/// BGC version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a runtime configured from the environment
///
/// Starts from `GcConfig::default()` and applies the `BGC_*` overrides
/// (see [`GcConfig::from_env`]).
///
/// # Examples
///
/// ```rust
/// let mut runtime = bgc::init()?;
/// runtime.shutdown()?;
/// # Ok::<(), bgc::BgcError>(())
/// ```
pub fn init() -> Result<Runtime> {
    Runtime::new(GcConfig::from_env())
}

/// Create a runtime with the given configuration
///
/// # Examples
///
/// ```rust
/// use bgc::GcConfig;
///
/// let config = GcConfig {
///     max_heap_size: Some(16 * 1024 * 1024),
///     ..Default::default()
/// };
///
/// let runtime = bgc::init_with_config(config)?;
/// # Ok::<(), bgc::BgcError>(())
/// ```
pub fn init_with_config(config: GcConfig) -> Result<Runtime> {
    Runtime::new(config)
}
