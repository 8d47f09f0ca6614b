//! Unwind-policy and qualifier-combination tests
//!
//! Exercises all four qualifier combinations of the reference types and
//! the panic behavior of the default (may-unwind) policy. The abort path
//! of the no-unwind policy terminates the process by design and is not
//! exercised in-process; its disarm path is covered here and in unit
//! tests.
//!
//! # Running Tests
//! ```bash
//! cargo test --test policy_tests
//! ```

use fnref::{FnMutRef, FnRef, NoUnwindFnMutRef, NoUnwindFnRef};

fn add1(x: i32) -> i32 {
    x + 1
}

// ===== All Four Qualifier Combinations =====

#[test]
fn test_read_only_may_unwind() {
    let r = FnRef::<fn(i32) -> i32>::new(add1);
    assert_eq!(r.call((5,)), 6);
}

#[test]
fn test_read_only_no_unwind() {
    let r = NoUnwindFnRef::<fn(i32) -> i32>::new(add1);
    assert_eq!(r.call((5,)), 6);
}

#[test]
fn test_mutable_may_unwind() {
    let mut total = 0;
    let mut acc = |x: i32| {
        total += x;
        total
    };

    let mut r = FnMutRef::<fn(i32) -> i32>::from_mut(&mut acc);
    assert_eq!(r.call((4,)), 4);
}

#[test]
fn test_mutable_no_unwind() {
    let mut total = 0;
    let mut acc = |x: i32| {
        total += x;
        total
    };

    let mut r = NoUnwindFnMutRef::<fn(i32) -> i32>::from_mut(&mut acc);
    assert_eq!(r.call((4,)), 4);
    assert_eq!(r.call((4,)), 8);
}

#[test]
fn test_no_unwind_strategies_all_dispatch() {
    struct Widget {
        n: i32,
    }
    impl Widget {
        fn n(&self) -> i32 {
            self.n
        }
    }

    let widget = Widget { n: 9 };
    let closure = |x: i32| x * 3;

    let by_ptr = NoUnwindFnRef::<fn(i32) -> i32>::new(add1);
    let by_ref = NoUnwindFnRef::<fn(i32) -> i32>::from_ref(&closure);
    let stateless = NoUnwindFnRef::<fn(i32) -> i32>::from_stateless(add1);
    let method = NoUnwindFnRef::<fn() -> i32>::from_method(&widget, Widget::n);

    assert_eq!(by_ptr.call((1,)), 2);
    assert_eq!(by_ref.call((1,)), 3);
    assert_eq!(stateless.call((1,)), 2);
    assert_eq!(method.call(()), 9);
}

// ===== Panic Propagation (may-unwind) =====

#[test]
#[should_panic(expected = "referent failed")]
fn test_may_unwind_propagates_referent_panic() {
    let failing = |_: i32| -> i32 { panic!("referent failed") };

    let r = FnRef::<fn(i32) -> i32>::from_ref(&failing);
    let _ = r.call((0,));
}

#[test]
fn test_call_after_caught_panic_still_works() {
    let failing = |x: i32| -> i32 {
        if x < 0 {
            panic!("negative input")
        } else {
            x
        }
    };

    let r = FnRef::<fn(i32) -> i32>::from_ref(&failing);

    let caught = std::panic::catch_unwind(|| r.call((-1,)));
    assert!(caught.is_err());

    // The binding is unaffected by the unwound call.
    assert_eq!(r.call((3,)), 3);
}
