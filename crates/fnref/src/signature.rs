//! Type-level call signatures and invocability predicates
//!
//! A call signature is described by a bare fn-pointer *type*: `fn(i32) -> i32`
//! names "takes one `i32`, returns `i32`" the same way `R(Args...)` does in
//! other languages. The [`Signature`] trait, implemented for fn-pointer types
//! of arity 0 through 12, recovers the parameter list as a tuple and the
//! return type, and carries the crate-private machinery for erasing and
//! un-erasing function addresses.
//!
//! The invocability predicates of the binding strategies are ordinary trait
//! bounds:
//!
//! - [`Callable<Args>`] — invocable through a shared reference (the
//!   read-only-receiver qualifier);
//! - [`CallableMut<Args>`] — invocable through a mutable reference;
//! - [`Method<Recv, Args>`] — invocable with an explicit receiver prepended
//!   to the declared parameters (the member-pointer shape).
//!
//! All three are blanket-implemented over the `Fn` traits per arity, so any
//! closure, function item, or function pointer of matching shape satisfies
//! them. A binding that fails every predicate is a compile error, never a
//! runtime one.
//!
//! # Limitation
//!
//! Signatures whose parameters contain references must use a concrete
//! lifetime (`fn(&'static str) -> usize`, or a named lifetime in scope).
//! Higher-ranked fn-pointer types such as `for<'r> fn(&'r str) -> usize` do
//! not implement [`Signature`].

use std::mem;

mod sealed {
    pub trait Sealed {}
}

/// A type-level call signature, implemented for `fn(...) -> R` types of
/// arity 0 through 12.
///
/// This trait is sealed; it cannot be implemented outside the crate.
pub trait Signature: Copy + sealed::Sealed {
    /// The declared parameter types, as a tuple.
    type Args;

    /// The declared return type.
    type Ret;

    #[doc(hidden)]
    fn erase_addr(self) -> fn();

    /// # Safety
    ///
    /// `addr` must have been produced by `erase_addr` on a value of `Self`.
    #[doc(hidden)]
    unsafe fn from_erased_addr(addr: fn()) -> Self;

    #[doc(hidden)]
    fn invoke_ptr(self, args: Self::Args) -> Self::Ret;
}

/// A callable invocable through a shared reference with the given argument
/// tuple. Satisfied by anything implementing the matching `Fn` trait.
pub trait Callable<Args> {
    /// Result type of the call.
    type Output;

    /// Invoke through a shared reference.
    fn invoke(&self, args: Args) -> Self::Output;
}

/// A callable invocable through a mutable reference with the given argument
/// tuple. Satisfied by anything implementing the matching `FnMut` trait.
pub trait CallableMut<Args> {
    /// Result type of the call.
    type Output;

    /// Invoke through a mutable reference.
    fn invoke_mut(&mut self, args: Args) -> Self::Output;
}

/// A callable taking an explicit receiver ahead of the declared parameters:
/// the shape of a method path (`Widget::area`) or a field-accessor closure
/// (`|w: &Widget| w.frame`).
pub trait Method<Recv, Args> {
    /// Result type of the call.
    type Output;

    /// Invoke with `recv` prepended to `args`.
    fn invoke_on(&self, recv: Recv, args: Args) -> Self::Output;
}

macro_rules! impl_signature {
    ($(($($idx:tt $arg:ident),*))+) => {$(
        impl<Ret $(, $arg)*> sealed::Sealed for fn($($arg),*) -> Ret {}

        impl<Ret $(, $arg)*> Signature for fn($($arg),*) -> Ret {
            type Args = ($($arg,)*);
            type Ret = Ret;

            #[doc(hidden)]
            #[inline]
            fn erase_addr(self) -> fn() {
                // fn pointers share one representation regardless of
                // signature; the paired thunk restores the real type.
                unsafe { mem::transmute::<Self, fn()>(self) }
            }

            #[doc(hidden)]
            #[inline]
            unsafe fn from_erased_addr(addr: fn()) -> Self {
                unsafe { mem::transmute::<fn(), Self>(addr) }
            }

            #[doc(hidden)]
            #[inline]
            fn invoke_ptr(self, args: Self::Args) -> Ret {
                let _ = &args;
                (self)($(args.$idx),*)
            }
        }

        impl<Func, Out $(, $arg)*> Callable<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn invoke(&self, args: ($($arg,)*)) -> Out {
                let _ = &args;
                (self)($(args.$idx),*)
            }
        }

        impl<Func, Out $(, $arg)*> CallableMut<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn invoke_mut(&mut self, args: ($($arg,)*)) -> Out {
                let _ = &args;
                (self)($(args.$idx),*)
            }
        }

        impl<Func, Out, Recv $(, $arg)*> Method<Recv, ($($arg,)*)> for Func
        where
            Func: Fn(Recv $(, $arg)*) -> Out,
        {
            type Output = Out;

            #[inline]
            fn invoke_on(&self, recv: Recv, args: ($($arg,)*)) -> Out {
                let _ = &args;
                (self)(recv $(, args.$idx)*)
            }
        }
    )+};
}

impl_signature! {
    ()
    (0 A0)
    (0 A0, 1 A1)
    (0 A0, 1 A1, 2 A2)
    (0 A0, 1 A1, 2 A2, 3 A3)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7, 8 A8)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7, 8 A8, 9 A9)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7, 8 A8, 9 A9, 10 A10)
    (0 A0, 1 A1, 2 A2, 3 A3, 4 A4, 5 A5, 6 A6, 7 A7, 8 A8, 9 A9, 10 A10, 11 A11)
}
