//! fnref - non-owning, non-allocating callable references
//!
//! This crate provides two-word, type-erased references to callables:
//! - Function pointers, bound by value
//! - Stateful callables, bound by (shared or mutable) reference
//! - Zero-sized callables (function items, capture-free closures), bound
//!   with no storage at all
//! - Method paths and field accessors, bound together with their receiver
//!
//! A reference is one opaque storage word plus one dispatch thunk. It never
//! allocates, never copies the referent, and never owns it: the referent's
//! lifetime is tracked by an ordinary borrow. Which binding strategy
//! applies is decided entirely at compile time by trait bounds; the thunk
//! generated for the chosen strategy carries all static type knowledge, so
//! no runtime tag or inspection exists anywhere.
//!
//! # Choosing a reference type
//!
//! The signature is spelled as a fn-pointer type, and two qualifiers pick
//! the exact contract:
//!
//! | receiver     | may panic                | must not panic               |
//! |--------------|--------------------------|------------------------------|
//! | read-only    | [`FnRef<'a, S>`]         | [`NoUnwindFnRef<'a, S>`]     |
//! | mutable      | [`FnMutRef<'a, S>`]      | [`NoUnwindFnMutRef<'a, S>`]  |
//!
//! The "must not panic" variants abort the process if the bound callable
//! panics anyway; see [`policy`].
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//!
//! use fnref::FnRef;
//!
//! fn add1(x: i32) -> i32 {
//!     x + 1
//! }
//!
//! // Function pointer binding.
//! let mut r = FnRef::<fn(i32) -> i32>::new(add1);
//! assert_eq!(r.call((5,)), 6);
//!
//! // Rebinding is whole-value assignment.
//! let n = Cell::new(10);
//! let closure = |x: i32| n.get() + x;
//! r = FnRef::from_ref(&closure);
//! assert_eq!(r.call((5,)), 15);
//!
//! // The referent is aliased, not copied.
//! n.set(20);
//! assert_eq!(r.call((5,)), 25);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod fn_mut_ref;
pub mod fn_ref;
pub mod policy;
pub mod signature;
mod storage;
mod thunk;

pub use fn_mut_ref::FnMutRef;
pub use fn_ref::FnRef;
pub use policy::{AbortOnUnwind, MayUnwind, UnwindPolicy};
pub use signature::{Callable, CallableMut, Method, Signature};

/// Read-only-receiver reference whose calls must not panic; a panic in the
/// bound callable aborts the process.
pub type NoUnwindFnRef<'a, S> = FnRef<'a, S, AbortOnUnwind>;

/// Mutable-receiver reference whose calls must not panic; a panic in the
/// bound callable aborts the process.
pub type NoUnwindFnMutRef<'a, S> = FnMutRef<'a, S, AbortOnUnwind>;
