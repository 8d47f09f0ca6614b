//! `FnRef`: callable reference with a read-only receiver
//!
//! `FnRef<'a, S>` is the shared-receiver reference: every binding strategy
//! only ever needs `&F` of the referent at call time, so the handle is
//! `Copy` and dispatches through `&self`. It is the analog of a signature
//! qualified read-only in the source contract.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │ storage      │ thunk        │   two words, trivially copyable
//! │ (Opaque)     │ (fn pointer) │
//! └──────────────┴──────────────┘
//! ```
//!
//! The two fields are written only as a pair: by a constructor, by
//! whole-value assignment, or by [`FnRef::swap`]. No operation mutates one
//! field without the other.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::policy::{MayUnwind, UnwindPolicy};
use crate::signature::{Callable, Method, Signature};
use crate::storage::Opaque;
use crate::thunk::{self, Thunk};

/// A non-owning, non-allocating reference to a callable, invocable through
/// a shared borrow.
///
/// `S` is the call signature as a fn-pointer type (`fn(i32) -> i32`); `P`
/// selects the unwind policy and defaults to [`MayUnwind`].
///
/// The reference records the referent's location only. The caller must keep
/// the referent alive and unmoved for `'a`; the borrow checker enforces
/// this for the safe constructors.
///
/// # Example
///
/// ```
/// use fnref::FnRef;
///
/// fn add1(x: i32) -> i32 {
///     x + 1
/// }
///
/// let r = FnRef::<fn(i32) -> i32>::new(add1);
/// assert_eq!(r.call((5,)), 6);
/// ```
pub struct FnRef<'a, S: Signature, P: UnwindPolicy = MayUnwind> {
    store: Opaque,
    thunk: Thunk<S>,
    _marker: PhantomData<(&'a (), P)>,
}

impl<'a, S: Signature, P: UnwindPolicy> FnRef<'a, S, P> {
    /// Bind a plain function pointer of exactly the declared signature.
    ///
    /// A function pointer with a mismatched signature is rejected at
    /// compile time:
    ///
    /// ```compile_fail
    /// fn add1(x: i32) -> i32 {
    ///     x + 1
    /// }
    ///
    /// let r = fnref::FnRef::<fn(i32) -> bool>::new(add1);
    /// ```
    pub fn new(f: S) -> Self {
        FnRef {
            store: Opaque::from_fn_addr(f.erase_addr()),
            thunk: thunk::fn_ptr::<S, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind any callable object by shared reference.
    ///
    /// The referent is aliased, never copied: state it reads is observed at
    /// call time, not captured at binding time.
    ///
    /// Arity or type mismatches are rejected at compile time:
    ///
    /// ```compile_fail
    /// use fnref::FnRef;
    ///
    /// let two_args = |x: i32, y: i32| x + y;
    /// let r = FnRef::<fn(i32) -> i32>::from_ref(&two_args);
    /// ```
    pub fn from_ref<F>(f: &'a F) -> Self
    where
        F: Callable<S::Args, Output = S::Ret>,
    {
        FnRef {
            store: Opaque::from_const_obj(f),
            thunk: thunk::object::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized callable by value: a function item or a
    /// capture-free closure. Storage is unused; no object is referenced,
    /// so the resulting reference borrows nothing.
    ///
    /// Passing a callable with captured state fails to compile (the
    /// zero-size check is evaluated during monomorphization):
    ///
    /// ```compile_fail
    /// use fnref::FnRef;
    ///
    /// let offset = 1;
    /// let capturing = move |x: i32| x + offset;
    /// let r = FnRef::<fn(i32) -> i32>::from_stateless(capturing);
    /// ```
    pub fn from_stateless<F>(f: F) -> Self
    where
        F: Callable<S::Args, Output = S::Ret> + Copy,
    {
        // The instance is the witness that `F` is constructible; the thunk
        // conjures an identical one per call.
        let _ = f;
        FnRef {
            store: Opaque::unused(),
            thunk: thunk::stateless::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized method-shaped callable together with its receiver:
    /// a method path (`Widget::area`) or a field-accessor closure
    /// (`|w: &Widget| w.frame`). The declared parameters follow the
    /// receiver.
    ///
    /// A callable that does not accept the receiver is rejected at compile
    /// time:
    ///
    /// ```compile_fail
    /// use fnref::FnRef;
    ///
    /// struct Widget {
    ///     n: i32,
    /// }
    ///
    /// let w = Widget { n: 1 };
    /// let r = FnRef::<fn() -> i32>::from_method(&w, || 3);
    /// ```
    pub fn from_method<T, F>(recv: &'a T, f: F) -> Self
    where
        F: for<'t> Method<&'t T, S::Args, Output = S::Ret> + Copy,
    {
        let _ = f;
        FnRef {
            store: Opaque::from_const_obj(recv),
            thunk: thunk::method::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Like [`FnRef::from_method`], but the receiver is supplied as a raw
    /// pointer and its validity is the caller's responsibility.
    ///
    /// # Safety
    ///
    /// `recv` must point to a live `T` that remains valid, and validly
    /// shared, for the lifetime `'a` and for every call made through the
    /// returned reference.
    pub unsafe fn from_method_ptr<T, F>(recv: NonNull<T>, f: F) -> Self
    where
        F: for<'t> Method<&'t T, S::Args, Output = S::Ret> + Copy,
    {
        let _ = f;
        FnRef {
            store: Opaque::from_const_obj(recv.as_ptr().cast_const()),
            thunk: thunk::method::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Invoke the bound callable with the declared parameters, supplied as
    /// a tuple.
    ///
    /// Calling a default-constructed (unbound) reference panics; under
    /// [`AbortOnUnwind`](crate::AbortOnUnwind) it aborts.
    #[inline]
    pub fn call(&self, args: S::Args) -> S::Ret {
        (self.thunk)(self.store, args)
    }

    /// Exchange the bindings of two references as whole (storage, thunk)
    /// pairs. Never fails, never partially swaps.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

/// Discarding bindings, available when the declared signature returns `()`:
/// the bound callable may return any value and the thunk drops it.
impl<'a, S, P> FnRef<'a, S, P>
where
    S: Signature<Ret = ()>,
    P: UnwindPolicy,
{
    /// Bind a function pointer with matching parameters and any return
    /// type; the result of each call is discarded.
    pub fn new_discarding<F>(f: F) -> Self
    where
        F: Signature<Args = S::Args>,
    {
        FnRef {
            store: Opaque::from_fn_addr(f.erase_addr()),
            thunk: thunk::fn_ptr_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a callable object by shared reference, discarding its result.
    pub fn from_ref_discarding<F>(f: &'a F) -> Self
    where
        F: Callable<S::Args>,
    {
        FnRef {
            store: Opaque::from_const_obj(f),
            thunk: thunk::object_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized callable by value, discarding its result.
    pub fn from_stateless_discarding<F>(f: F) -> Self
    where
        F: Callable<S::Args> + Copy,
    {
        let _ = f;
        FnRef {
            store: Opaque::unused(),
            thunk: thunk::stateless_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized method-shaped callable and its receiver,
    /// discarding the method's result.
    pub fn from_method_discarding<T, F>(recv: &'a T, f: F) -> Self
    where
        F: for<'t> Method<&'t T, S::Args> + Copy,
    {
        let _ = f;
        FnRef {
            store: Opaque::from_const_obj(recv),
            thunk: thunk::method_discarding::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, S: Signature, P: UnwindPolicy> Default for FnRef<'a, S, P> {
    /// An unbound reference. Invoking it is a contract violation and
    /// panics (aborts under [`AbortOnUnwind`](crate::AbortOnUnwind));
    /// bind it by whole-value assignment before use.
    fn default() -> Self {
        FnRef {
            store: Opaque::unused(),
            thunk: thunk::unbound::<S, P>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, S: Signature, P: UnwindPolicy> Clone for FnRef<'a, S, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Signature, P: UnwindPolicy> Copy for FnRef<'a, S, P> {}

impl<'a, S: Signature, P: UnwindPolicy> fmt::Debug for FnRef<'a, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRef")
            .field("thunk", &(self.thunk as usize as *const ()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add1(x: i32) -> i32 {
        x + 1
    }

    #[test]
    fn test_fn_pointer_binding() {
        let r = FnRef::<fn(i32) -> i32>::new(add1);
        assert_eq!(r.call((5,)), 6);
    }

    #[test]
    fn test_copy_duplicates_the_pair() {
        let r = FnRef::<fn(i32) -> i32>::new(add1);
        let r2 = r;
        assert_eq!(r.call((1,)), 2);
        assert_eq!(r2.call((1,)), 2);
    }

    #[test]
    fn test_reference_is_two_words() {
        assert_eq!(
            mem::size_of::<FnRef<'_, fn(i32) -> i32>>(),
            2 * mem::size_of::<usize>()
        );
    }

    #[test]
    #[should_panic(expected = "unbound callable reference")]
    fn test_unbound_call_panics() {
        let r = FnRef::<fn(i32) -> i32>::default();
        r.call((5,));
    }

    #[test]
    fn test_debug_is_opaque_but_present() {
        let r = FnRef::<fn(i32) -> i32>::new(add1);
        let rendered = format!("{r:?}");
        assert!(rendered.starts_with("FnRef"));
    }
}
