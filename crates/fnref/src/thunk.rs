//! Thunk generation: one dispatch function per distinct bound type
//!
//! A thunk is a plain `fn` pointer taking the opaque storage prepended to
//! the declared parameter tuple. Each generator below monomorphizes a
//! non-capturing closure against the concrete bound type, so the closure
//! coerces to a function pointer with the bound type's layout knowledge,
//! the result handling, and the unwind policy all baked into its body.
//! Nothing is discovered at call time.
//!
//! Every generator corresponds to exactly one binding strategy of the
//! construction resolver; the reference types pair each generated thunk
//! with the storage written by the same strategy, never independently.

use crate::policy::UnwindPolicy;
use crate::signature::{Callable, CallableMut, Method, Signature};
use crate::storage::{conjure_zst, Opaque};

/// The shape shared by every thunk for signature `S`: the declared
/// parameter list with the storage word prepended.
pub(crate) type Thunk<S> = fn(Opaque, <S as Signature>::Args) -> <S as Signature>::Ret;

/// Thunk for the unbound (default-constructed) state. The storage is
/// never read; invocation is a contract violation and panics. Under
/// [`AbortOnUnwind`](crate::AbortOnUnwind) the panic becomes an abort.
pub(crate) fn unbound<S, P>() -> Thunk<S>
where
    S: Signature,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |_, _| P::protect(|| panic!("invoked an unbound callable reference"));
    thunk
}

/// Strategy 1: storage holds an erased function address of type `S`.
pub(crate) fn fn_ptr<S, P>() -> Thunk<S>
where
    S: Signature,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { S::from_erased_addr(store.fn_addr()) };
        P::protect(move || f.invoke_ptr(args))
    };
    thunk
}

/// Strategy 1, discarding variant: the bound function may return anything;
/// the declared signature returns `()`.
pub(crate) fn fn_ptr_discarding<S, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: Signature<Args = S::Args>,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { F::from_erased_addr(store.fn_addr()) };
        P::protect(move || {
            f.invoke_ptr(args);
        })
    };
    thunk
}

/// Strategy 2: storage holds the address of a shared-borrowed `F`.
pub(crate) fn object<S, F, P>() -> Thunk<S>
where
    S: Signature,
    F: Callable<S::Args, Output = S::Ret>,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { store.deref::<F>() };
        P::protect(move || f.invoke(args))
    };
    thunk
}

/// Strategy 2, discarding variant.
pub(crate) fn object_discarding<S, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: Callable<S::Args>,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { store.deref::<F>() };
        P::protect(move || {
            f.invoke(args);
        })
    };
    thunk
}

/// Strategy 2 for mutable receivers: storage holds the address of a
/// mutably-borrowed `F`. Exclusivity is guaranteed by the owning
/// `FnMutRef`, which is not copyable and dispatches through `&mut self`.
pub(crate) fn object_mut<S, F, P>() -> Thunk<S>
where
    S: Signature,
    F: CallableMut<S::Args, Output = S::Ret>,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { store.deref_mut::<F>() };
        P::protect(move || f.invoke_mut(args))
    };
    thunk
}

/// Strategy 2 for mutable receivers, discarding variant.
pub(crate) fn object_mut_discarding<S, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: CallableMut<S::Args>,
    P: UnwindPolicy,
{
    let thunk: Thunk<S> = |store, args| {
        let f = unsafe { store.deref_mut::<F>() };
        P::protect(move || {
            f.invoke_mut(args);
        })
    };
    thunk
}

/// Strategy 3: the callable is a zero-sized value; storage is unused and
/// the thunk conjures the instance at each call.
pub(crate) fn stateless<S, F, P>() -> Thunk<S>
where
    S: Signature,
    F: Callable<S::Args, Output = S::Ret> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "stateless bindings require a zero-sized callable \
             (a function item or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |_, args| {
        let f: F = unsafe { conjure_zst() };
        P::protect(move || f.invoke(args))
    };
    thunk
}

/// Strategy 3, discarding variant.
pub(crate) fn stateless_discarding<S, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: Callable<S::Args> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "stateless bindings require a zero-sized callable \
             (a function item or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |_, args| {
        let f: F = unsafe { conjure_zst() };
        P::protect(move || {
            f.invoke(args);
        })
    };
    thunk
}

/// Strategy 3 for mutable receivers: a zero-sized `FnMut` callable.
pub(crate) fn stateless_mut<S, F, P>() -> Thunk<S>
where
    S: Signature,
    F: CallableMut<S::Args, Output = S::Ret> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "stateless bindings require a zero-sized callable \
             (a function item or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |_, args| {
        let mut f: F = unsafe { conjure_zst() };
        P::protect(move || f.invoke_mut(args))
    };
    thunk
}

/// Strategy 3 for mutable receivers, discarding variant.
pub(crate) fn stateless_mut_discarding<S, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: CallableMut<S::Args> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "stateless bindings require a zero-sized callable \
             (a function item or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |_, args| {
        let mut f: F = unsafe { conjure_zst() };
        P::protect(move || {
            f.invoke_mut(args);
        })
    };
    thunk
}

/// Strategy 4: a zero-sized method-shaped callable applied to the object
/// whose address is in storage, borrowed shared.
pub(crate) fn method<S, T, F, P>() -> Thunk<S>
where
    S: Signature,
    F: for<'t> Method<&'t T, S::Args, Output = S::Ret> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "method bindings require a zero-sized callable \
             (a method path or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |store, args| {
        let recv = unsafe { store.deref::<T>() };
        let f: F = unsafe { conjure_zst() };
        P::protect(move || f.invoke_on(recv, args))
    };
    thunk
}

/// Strategy 4, discarding variant.
pub(crate) fn method_discarding<S, T, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: for<'t> Method<&'t T, S::Args> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "method bindings require a zero-sized callable \
             (a method path or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |store, args| {
        let recv = unsafe { store.deref::<T>() };
        let f: F = unsafe { conjure_zst() };
        P::protect(move || {
            f.invoke_on(recv, args);
        })
    };
    thunk
}

/// Strategy 4 for mutable receivers: the object in storage is borrowed
/// mutably for the duration of the call.
pub(crate) fn method_mut<S, T, F, P>() -> Thunk<S>
where
    S: Signature,
    F: for<'t> Method<&'t mut T, S::Args, Output = S::Ret> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "method bindings require a zero-sized callable \
             (a method path or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |store, args| {
        let recv = unsafe { store.deref_mut::<T>() };
        let f: F = unsafe { conjure_zst() };
        P::protect(move || f.invoke_on(recv, args))
    };
    thunk
}

/// Strategy 4 for mutable receivers, discarding variant.
pub(crate) fn method_mut_discarding<S, T, F, P>() -> Thunk<S>
where
    S: Signature<Ret = ()>,
    F: for<'t> Method<&'t mut T, S::Args> + Copy,
    P: UnwindPolicy,
{
    const {
        assert!(
            std::mem::size_of::<F>() == 0,
            "method bindings require a zero-sized callable \
             (a method path or capture-free closure)"
        )
    };
    let thunk: Thunk<S> = |store, args| {
        let recv = unsafe { store.deref_mut::<T>() };
        let f: F = unsafe { conjure_zst() };
        P::protect(move || {
            f.invoke_on(recv, args);
        })
    };
    thunk
}
