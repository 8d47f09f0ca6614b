//! Opaque storage for the bound callable's location
//!
//! This module implements the single-word handle that records where a bound
//! callable lives. It is an *untagged* union: nothing in the representation
//! says which interpretation is active.
//!
//! # Encoding Strategy
//!
//! ```text
//! obj:   *mut ()    address of a mutably-borrowed callable object
//! cobj:  *const ()  address of a shared-borrowed callable object
//! func:  fn()       erased address of a plain function
//! ```
//!
//! The active interpretation is determined entirely by the thunk that was
//! generated alongside the storage at binding time. The thunk reads the one
//! field its binding strategy wrote; reading any other field is a bug in
//! this crate, never observable by users. Storage and thunk are therefore
//! only ever constructed, copied, and replaced together as a pair.

use std::mem;
use std::ptr::{self, NonNull};

/// Untagged storage for one bound callable.
///
/// Exactly one field is meaningful per instance. The union is `Copy` and
/// pointer-sized; copying it is only valid together with its paired thunk,
/// which the reference types guarantee structurally.
#[derive(Clone, Copy)]
pub(crate) union Opaque {
    /// Address of a mutably-aliased callable object.
    obj: *mut (),
    /// Address of a shared-aliased callable object.
    cobj: *const (),
    /// Type-erased function address.
    func: fn(),
}

impl Opaque {
    /// Storage for a binding that carries no runtime state.
    ///
    /// Used by the zero-sized-callable strategy and by unbound references;
    /// the paired thunk never reads it.
    pub(crate) const fn unused() -> Self {
        Opaque {
            obj: ptr::null_mut(),
        }
    }

    /// Record the address of a mutably-borrowed object.
    pub(crate) fn from_obj<T>(p: *mut T) -> Self {
        Opaque { obj: p.cast() }
    }

    /// Record the address of a shared-borrowed object.
    pub(crate) fn from_const_obj<T>(p: *const T) -> Self {
        Opaque { cobj: p.cast() }
    }

    /// Record an erased function address.
    pub(crate) fn from_fn_addr(f: fn()) -> Self {
        Opaque { func: f }
    }

    /// Reinterpret the storage as a shared reference to `T`.
    ///
    /// # Safety
    ///
    /// The storage must have been created by [`Opaque::from_const_obj`] (or
    /// [`Opaque::from_obj`]) with a `T` that is still live and validly
    /// shared for the chosen lifetime `'t`.
    #[inline]
    pub(crate) unsafe fn deref<'t, T>(self) -> &'t T {
        unsafe { &*self.cobj.cast::<T>() }
    }

    /// Reinterpret the storage as a mutable reference to `T`.
    ///
    /// # Safety
    ///
    /// The storage must have been created by [`Opaque::from_obj`] with a
    /// `T` that is still live and not aliased for the chosen lifetime `'t`.
    #[inline]
    pub(crate) unsafe fn deref_mut<'t, T>(self) -> &'t mut T {
        unsafe { &mut *self.obj.cast::<T>() }
    }

    /// Read back the erased function address.
    ///
    /// # Safety
    ///
    /// The storage must have been created by [`Opaque::from_fn_addr`].
    #[inline]
    pub(crate) unsafe fn fn_addr(self) -> fn() {
        unsafe { self.func }
    }
}

/// Materialize a zero-sized callable out of thin air.
///
/// This is the `Vec<ZST>` trick: a read of size zero from an aligned,
/// non-null dangling pointer. The binding constructors prove an instance
/// of `F` existed by consuming one, so conjuring another is sound.
///
/// # Safety
///
/// `F` must be zero-sized, and an instance of `F` must have been witnessed
/// at binding time.
#[inline]
pub(crate) unsafe fn conjure_zst<F>() -> F {
    debug_assert_eq!(mem::size_of::<F>(), 0);
    unsafe { NonNull::<F>::dangling().as_ptr().read() }
}
