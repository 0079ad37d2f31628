// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying several per-element initializers to one element.
//!
//! Initializers such as "resize on content changes" and "inherit background
//! color" each take the element by reference and register their own
//! listeners; none assumes it is the only one.

/// Calls every function in `fns`, in order, with `target`.
pub fn apply_functions<T: ?Sized>(target: &T, fns: &[&dyn Fn(&T)]) {
    for f in fns {
        f(target);
    }
}

/// Like [`apply_functions`], then hands `value` back for further chaining.
pub fn pipe<T>(value: T, fns: &[&dyn Fn(&T)]) -> T {
    apply_functions(&value, fns);
    value
}
