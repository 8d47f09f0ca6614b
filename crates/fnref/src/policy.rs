//! Unwind policies: the no-throw qualifier of a signature
//!
//! A reference type is instantiated with one of two policies, fixed at the
//! type level:
//!
//! - [`MayUnwind`] (the default) — a panic in the bound callable unwinds
//!   through the call as usual.
//! - [`AbortOnUnwind`] — the reference promises its callers that a call
//!   never unwinds. The generated thunk enforces the promise at the
//!   dispatch boundary: if the bound callable panics anyway, the process
//!   aborts. The contract is kept strict rather than silently downgraded.
//!
//! The policy is compiled into every thunk at its generation site; there is
//! no per-call branch on the happy path.

use std::process;

mod sealed {
    pub trait Sealed {}
}

/// Marker trait selecting unwind behavior at the dispatch boundary.
///
/// This trait is sealed; [`MayUnwind`] and [`AbortOnUnwind`] are the only
/// implementations.
pub trait UnwindPolicy: sealed::Sealed {
    #[doc(hidden)]
    fn protect<T>(call: impl FnOnce() -> T) -> T;
}

/// Panics from the bound callable unwind through the call (the default).
#[derive(Debug)]
pub enum MayUnwind {}

/// Panics from the bound callable abort the process at the dispatch
/// boundary.
#[derive(Debug)]
pub enum AbortOnUnwind {}

impl sealed::Sealed for MayUnwind {}

impl UnwindPolicy for MayUnwind {
    #[inline]
    fn protect<T>(call: impl FnOnce() -> T) -> T {
        call()
    }
}

impl sealed::Sealed for AbortOnUnwind {}

impl UnwindPolicy for AbortOnUnwind {
    #[inline]
    fn protect<T>(call: impl FnOnce() -> T) -> T {
        // Armed guard: only an unwind out of `call` can run the drop.
        struct AbortGuard;

        impl Drop for AbortGuard {
            fn drop(&mut self) {
                process::abort();
            }
        }

        let guard = AbortGuard;
        let result = call();
        std::mem::forget(guard);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_may_unwind_passthrough() {
        assert_eq!(MayUnwind::protect(|| 41 + 1), 42);
    }

    #[test]
    fn test_abort_guard_disarmed_on_success() {
        // Reaching the assertion proves the guard was disarmed.
        assert_eq!(AbortOnUnwind::protect(|| "ok"), "ok");
    }
}
