//! Object Module - The contract shared by every Bob VM heap value
//!
//! Every value the interpreter keeps on the heap implements [`Object`].
//! The heap stores objects as `Box<dyn Object>` and hands out [`Handle`]s;
//! the collector only ever talks to objects through this trait.
//!
//! The mark bit is not part of the object. The heap keeps it next to the
//! boxed value so concrete types cannot read or clobber it.

pub mod equality;
pub mod handle;

#[cfg(test)]
pub(crate) mod testing;

pub use equality::{expect_peer, objects_equal};
pub use handle::Handle;

use crate::heap::Heap;
use crate::marker::Tracer;
use std::any::Any;

/// Capabilities every heap-resident value must supply
///
/// # Contract
///
/// - `repr` produces a human readable form, used for diagnostics.
/// - `equals_to` is only called after the equality relation has confirmed
///   that `other` has the same concrete type as `self`. Use
///   [`expect_peer`] to get at the typed peer; do not re-check the type.
/// - `mark_children` must report every [`Handle`] this object holds,
///   including handles stored inside plain containers. A missed handle is a
///   premature-reclamation bug.
///
/// # Examples
///
/// ```rust
/// use bgc::{expect_peer, Handle, Heap, Object, Tracer};
///
/// struct Pair {
///     car: Handle,
///     cdr: Handle,
/// }
///
/// impl Object for Pair {
///     fn repr(&self, heap: &Heap) -> String {
///         format!("({} . {})", heap.repr(self.car), heap.repr(self.cdr))
///     }
///
///     fn equals_to(&self, other: &dyn Object, heap: &Heap) -> bool {
///         let other = expect_peer::<Self>(other);
///         matches!(heap.equal(self.car, other.car), Ok(true))
///             && matches!(heap.equal(self.cdr, other.cdr), Ok(true))
///     }
///
///     fn mark_children(&self, tracer: &mut Tracer) {
///         tracer.mark(self.car);
///         tracer.mark(self.cdr);
///     }
/// }
/// ```
pub trait Object: Any + Send + 'static {
    /// Human-readable representation
    fn repr(&self, heap: &Heap) -> String;

    /// Compare against a peer of the same concrete type
    fn equals_to(&self, other: &dyn Object, heap: &Heap) -> bool;

    /// Report every referenced object to the tracer
    fn mark_children(&self, tracer: &mut Tracer);

    /// Name of the concrete type, for diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bytes charged to heap accounting for this object
    ///
    /// Defaults to the in-memory size of the value. Types owning large
    /// buffers may add those.
    fn heap_size(&self) -> usize {
        std::mem::size_of_val(self)
    }
}

impl dyn Object {
    /// Check whether the concrete type is `T`
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Downcast to the concrete type
    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Downcast to the concrete type, mutably
    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }

    /// Check whether both objects have the same concrete type
    #[inline]
    pub fn same_type_as(&self, other: &dyn Object) -> bool {
        let lhs: &dyn Any = self;
        let rhs: &dyn Any = other;
        lhs.type_id() == rhs.type_id()
    }
}
