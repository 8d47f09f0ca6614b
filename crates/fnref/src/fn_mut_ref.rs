//! `FnMutRef`: callable reference with a mutable receiver
//!
//! `FnMutRef<'a, S>` binds callables that need `&mut F` to run — stateful
//! closures, `FnMut` objects, methods taking `&mut self`. The handle itself
//! embodies the exclusive borrow: it is not `Copy`/`Clone`, dispatch takes
//! `&mut self`, and [`FnMutRef::reborrow`] hands out a shorter-lived handle
//! the way `&mut` reborrowing does. This rules out aliased mutable dispatch
//! at compile time instead of leaving it to caller discipline.
//!
//! Layout and pairing rules are identical to [`FnRef`](crate::FnRef): one
//! storage word, one thunk, always written together.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::policy::{MayUnwind, UnwindPolicy};
use crate::signature::{CallableMut, Method, Signature};
use crate::storage::Opaque;
use crate::thunk::{self, Thunk};

/// A non-owning, non-allocating reference to a callable, invocable through
/// a mutable borrow.
///
/// `S` is the call signature as a fn-pointer type; `P` selects the unwind
/// policy and defaults to [`MayUnwind`].
///
/// # Example
///
/// ```
/// use fnref::FnMutRef;
///
/// let mut total = 0;
/// let mut accumulate = |x: i32| {
///     total += x;
///     total
/// };
///
/// let mut r = FnMutRef::<fn(i32) -> i32>::from_mut(&mut accumulate);
/// assert_eq!(r.call((2,)), 2);
/// assert_eq!(r.call((3,)), 5);
/// ```
pub struct FnMutRef<'a, S: Signature, P: UnwindPolicy = MayUnwind> {
    store: Opaque,
    thunk: Thunk<S>,
    _marker: PhantomData<(&'a mut (), P)>,
}

impl<'a, S: Signature, P: UnwindPolicy> FnMutRef<'a, S, P> {
    /// Bind a plain function pointer of exactly the declared signature.
    pub fn new(f: S) -> Self {
        FnMutRef {
            store: Opaque::from_fn_addr(f.erase_addr()),
            thunk: thunk::fn_ptr::<S, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind any callable object by mutable reference. The handle holds the
    /// borrow for `'a`; the referent's state changes are observed by later
    /// calls.
    pub fn from_mut<F>(f: &'a mut F) -> Self
    where
        F: CallableMut<S::Args, Output = S::Ret>,
    {
        FnMutRef {
            store: Opaque::from_obj(f),
            thunk: thunk::object_mut::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized callable by value. Storage is unused.
    ///
    /// The zero-size check is evaluated during monomorphization; a callable
    /// with captured state fails to compile.
    pub fn from_stateless<F>(f: F) -> Self
    where
        F: CallableMut<S::Args, Output = S::Ret> + Copy,
    {
        let _ = f;
        FnMutRef {
            store: Opaque::unused(),
            thunk: thunk::stateless_mut::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized method-shaped callable together with its mutably
    /// borrowed receiver: a method path taking `&mut self`
    /// (`Counter::add`) or a capture-free closure over `&mut T`.
    pub fn from_method<T, F>(recv: &'a mut T, f: F) -> Self
    where
        F: for<'t> Method<&'t mut T, S::Args, Output = S::Ret> + Copy,
    {
        let _ = f;
        FnMutRef {
            store: Opaque::from_obj(recv),
            thunk: thunk::method_mut::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Like [`FnMutRef::from_method`], but the receiver is supplied as a
    /// raw pointer and its validity is the caller's responsibility.
    ///
    /// # Safety
    ///
    /// `recv` must point to a live `T` that remains valid, and not aliased,
    /// for the lifetime `'a` and for every call made through the returned
    /// reference.
    pub unsafe fn from_method_ptr<T, F>(recv: NonNull<T>, f: F) -> Self
    where
        F: for<'t> Method<&'t mut T, S::Args, Output = S::Ret> + Copy,
    {
        let _ = f;
        FnMutRef {
            store: Opaque::from_obj(recv.as_ptr()),
            thunk: thunk::method_mut::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Invoke the bound callable with the declared parameters, supplied as
    /// a tuple.
    ///
    /// Calling a default-constructed (unbound) reference panics; under
    /// [`AbortOnUnwind`](crate::AbortOnUnwind) it aborts.
    #[inline]
    pub fn call(&mut self, args: S::Args) -> S::Ret {
        (self.thunk)(self.store, args)
    }

    /// Hand out a shorter-lived handle to the same binding without giving
    /// this one up, mirroring `&mut` reborrowing.
    pub fn reborrow(&mut self) -> FnMutRef<'_, S, P> {
        FnMutRef {
            store: self.store,
            thunk: self.thunk,
            _marker: PhantomData,
        }
    }

    /// Exchange the bindings of two references as whole (storage, thunk)
    /// pairs. Never fails, never partially swaps.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

/// Discarding bindings, available when the declared signature returns `()`.
impl<'a, S, P> FnMutRef<'a, S, P>
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
        FnMutRef {
            store: Opaque::from_fn_addr(f.erase_addr()),
            thunk: thunk::fn_ptr_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a callable object by mutable reference, discarding its result.
    pub fn from_mut_discarding<F>(f: &'a mut F) -> Self
    where
        F: CallableMut<S::Args>,
    {
        FnMutRef {
            store: Opaque::from_obj(f),
            thunk: thunk::object_mut_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized callable by value, discarding its result.
    pub fn from_stateless_discarding<F>(f: F) -> Self
    where
        F: CallableMut<S::Args> + Copy,
    {
        let _ = f;
        FnMutRef {
            store: Opaque::unused(),
            thunk: thunk::stateless_mut_discarding::<S, F, P>(),
            _marker: PhantomData,
        }
    }

    /// Bind a zero-sized method-shaped callable and its mutably borrowed
    /// receiver, discarding the method's result.
    pub fn from_method_discarding<T, F>(recv: &'a mut T, f: F) -> Self
    where
        F: for<'t> Method<&'t mut T, S::Args> + Copy,
    {
        let _ = f;
        FnMutRef {
            store: Opaque::from_obj(recv),
            thunk: thunk::method_mut_discarding::<S, T, F, P>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, S: Signature, P: UnwindPolicy> Default for FnMutRef<'a, S, P> {
    /// An unbound reference. Invoking it is a contract violation and
    /// panics (aborts under [`AbortOnUnwind`](crate::AbortOnUnwind));
    /// bind it by whole-value assignment before use.
    fn default() -> Self {
        FnMutRef {
            store: Opaque::unused(),
            thunk: thunk::unbound::<S, P>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, S: Signature, P: UnwindPolicy> fmt::Debug for FnMutRef<'a, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMutRef")
            .field("thunk", &(self.thunk as usize as *const ()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stateful_closure_mutation_is_observed() {
        let mut calls = 0;
        let mut counting = |x: i32| {
            calls += 1;
            x + calls
        };

        let mut r = FnMutRef::<fn(i32) -> i32>::from_mut(&mut counting);
        assert_eq!(r.call((10,)), 11);
        assert_eq!(r.call((10,)), 12);
    }

    #[test]
    fn test_reborrow_dispatches_same_binding() {
        let mut hits = 0;
        let mut bump = |n: i32| {
            hits += n;
            hits
        };

        let mut r = FnMutRef::<fn(i32) -> i32>::from_mut(&mut bump);
        {
            let mut short = r.reborrow();
            assert_eq!(short.call((1,)), 1);
        }
        assert_eq!(r.call((1,)), 2);
    }

    #[test]
    #[should_panic(expected = "unbound callable reference")]
    fn test_unbound_call_panics() {
        let mut r = FnMutRef::<fn()>::default();
        r.call(());
    }
}
