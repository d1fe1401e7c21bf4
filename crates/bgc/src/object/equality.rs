//! Equality - Type-agnostic comparison of heap objects
//!
//! Comparison runs in three stages:
//! 1. Identity: the same object is always equal to itself.
//! 2. Concrete type: objects of different types are never equal.
//! 3. Delegation: same-type objects decide through `equals_to`.
//!
//! This is an equivalence test only. No ordering is implied.

use super::Object;
use crate::heap::Heap;

/// Compare two objects of any concrete type
///
/// Reflexive by construction. Symmetry and transitivity hold as long as the
/// concrete types' `equals_to` implementations are well behaved.
pub fn objects_equal(heap: &Heap, lhs: &dyn Object, rhs: &dyn Object) -> bool {
    if std::ptr::addr_eq(lhs as *const dyn Object, rhs as *const dyn Object) {
        return true;
    }

    if !lhs.same_type_as(rhs) {
        return false;
    }

    lhs.equals_to(rhs, heap)
}

/// Get the typed peer inside an `equals_to` implementation
///
/// # Panics
///
/// Panics when `other` is not a `T`. The equality relation checks types
/// before delegating, so reaching the panic means `equals_to` was called
/// directly with a foreign operand.
#[inline]
pub fn expect_peer<T: Object>(other: &dyn Object) -> &T {
    match other.downcast_ref::<T>() {
        Some(peer) => peer,
        None => unreachable!(
            "equals_to contract violated: expected {}, got {}",
            std::any::type_name::<T>(),
            other.type_name()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::testing::{Num, Sym};

    #[test]
    fn test_identity_is_equal() {
        let heap = Heap::default();
        let num = Num(5);
        assert!(objects_equal(&heap, &num, &num));
    }

    #[test]
    fn test_same_type_delegates() {
        let heap = Heap::default();
        assert!(objects_equal(&heap, &Num(5), &Num(5)));
        assert!(!objects_equal(&heap, &Num(5), &Num(6)));
    }

    #[test]
    fn test_different_types_unequal() {
        let heap = Heap::default();
        let num = Num(1);
        let sym = Sym("1".to_string());
        assert!(!objects_equal(&heap, &num, &sym));
        assert!(!objects_equal(&heap, &sym, &num));
    }

    #[test]
    #[should_panic(expected = "equals_to contract violated")]
    fn test_expect_peer_panics_on_foreign_operand() {
        let heap = Heap::default();
        Num(1).equals_to(&Sym("x".to_string()), &heap);
    }
}
