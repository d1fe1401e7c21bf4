//! Equality Tests - The type-agnostic equality relation
//!
//! Identity first, concrete type second, delegation last.

mod common;

use bgc::{objects_equal, BgcError, Handle};
use common::{drop_counter, GcFixture, Boolean, Nil, Number, Resource, Symbol, Vector};

#[test]
fn test_reflexive_for_every_type() {
    let mut fx = GcFixture::with_defaults();
    let counter = drop_counter();
    let n = fx.number(f64::NAN);
    let s = fx.symbol("x");
    let b = fx.heap.allocate(Boolean(true)).unwrap();
    let nil = fx.heap.allocate(Nil).unwrap();
    let v = fx.heap.allocate(Vector(vec![n, s])).unwrap();
    let r = fx.heap.allocate(Resource::new(0, &counter)).unwrap();

    for handle in [n, s, b, nil, v, r] {
        assert!(fx.heap.equal(handle, handle).unwrap());
        let object = fx.heap.get(handle).unwrap();
        assert!(objects_equal(&fx.heap, object, object));
    }
}

/// NaN never equals itself by value, but identity still wins
#[test]
fn test_identity_beats_value() {
    let mut fx = GcFixture::with_defaults();
    let a = fx.number(f64::NAN);
    let b = fx.number(f64::NAN);

    assert!(fx.heap.equal(a, a).unwrap());
    assert!(!fx.heap.equal(a, b).unwrap());
}

#[test]
fn test_different_types_never_equal() {
    let mut fx = GcFixture::with_defaults();
    let one = fx.number(1.0);
    let sym = fx.symbol("1");
    let t = fx.heap.allocate(Boolean(true)).unwrap();
    let nil = fx.heap.allocate(Nil).unwrap();
    let empty = fx.heap.allocate(Vector::default()).unwrap();

    let all = [one, sym, t, nil, empty];
    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            assert_eq!(fx.heap.equal(*a, *b).unwrap(), i == j, "{} vs {}", i, j);
        }
    }
}

#[test]
fn test_same_type_delegates() {
    let mut fx = GcFixture::with_defaults();
    let a = fx.symbol("lambda");
    let b = fx.symbol("lambda");
    let c = fx.symbol("define");

    assert!(fx.heap.equal(a, b).unwrap());
    assert!(fx.heap.equal(b, a).unwrap());
    assert!(!fx.heap.equal(a, c).unwrap());
}

/// Structural equality recurses through the heap
#[test]
fn test_structural_lists() {
    let mut fx = GcFixture::with_defaults();
    let one = fx.number(1.0);
    let two = fx.number(2.0);
    let other_two = fx.number(2.0);
    let three = fx.number(3.0);

    let l1 = fx.list(&[one, two]);
    let l2 = fx.list(&[one, other_two]);
    let l3 = fx.list(&[one, three]);

    assert!(fx.heap.equal(l1, l2).unwrap());
    assert!(!fx.heap.equal(l1, l3).unwrap());
}

#[test]
fn test_stale_operand_is_error() {
    let mut fx = GcFixture::with_defaults();
    let a = fx.number(1.0);
    let b = fx.number(1.0);
    fx.collect(&a);

    assert!(matches!(
        fx.heap.equal(a, b),
        Err(BgcError::StaleHandle { .. })
    ));
    assert!(matches!(
        fx.heap.equal(b, a),
        Err(BgcError::StaleHandle { .. })
    ));
    assert!(fx.heap.equal(b, b).is_err());
}

/// objects_equal works on values that never lived on a heap
#[test]
fn test_objects_equal_off_heap() {
    let fx = GcFixture::with_defaults();
    assert!(objects_equal(&fx.heap, &Number(4.0), &Number(4.0)));
    assert!(!objects_equal(&fx.heap, &Number(4.0), &Symbol("4".to_string())));
    assert!(!objects_equal(&fx.heap, &Boolean(false), &Nil));
}

/// Handle comparison is identity; heap comparison is value equality
#[test]
fn test_handle_identity_vs_value_equality() {
    let mut fx = GcFixture::with_defaults();
    let handles: Vec<Handle> = (0..2).map(|_| fx.number(1.0)).collect();

    assert_ne!(handles[0], handles[1]);
    assert!(fx.heap.equal(handles[0], handles[1]).unwrap());
}
