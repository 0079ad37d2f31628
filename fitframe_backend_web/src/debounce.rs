// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser-timer-backed debouncing for arbitrary actions.
//!
//! [`debounce`] wraps an action so that only the last of a burst of calls
//! runs, `delay` after the burst ends. The coalescing itself is the core
//! [`Debouncer`]; this module only owns the `setTimeout` that wakes it.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use fitframe_core::debounce::Debouncer;
use fitframe_core::time::Duration;
use wasm_bindgen::closure::Closure;

use crate::timeout::TimeoutSlot;

type Action<A> = Box<dyn FnMut(A)>;

/// A debounced action. Dropping it cancels any pending invocation.
pub struct Debounced<A: 'static> {
    inner: Rc<DebouncedInner<A>>,
}

struct DebouncedInner<A> {
    action: RefCell<Action<A>>,
    state: RefCell<Debouncer<A>>,
    timeout: TimeoutSlot,
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// Wraps `action` so a burst of calls closer than `delay` apart runs it once,
/// with the last call's arguments.
///
/// The returned handle must be kept alive for the action to run.
///
/// ```rust,ignore
/// use fitframe_backend_web::debounce;
/// use fitframe_core::time::Duration;
///
/// let save = debounce(|text: String| persist(&text), Duration::from_millis(250));
/// save.call("d".into());
/// save.call("dra".into());
/// save.call("draft".into());
/// // 250ms after the last call, `persist("draft")` runs once.
/// assert!(save.is_pending());
/// ```
pub fn debounce<A: 'static>(action: impl FnMut(A) + 'static, delay: Duration) -> Debounced<A> {
    let inner = Rc::new(DebouncedInner {
        action: RefCell::new(Box::new(action)),
        state: RefCell::new(Debouncer::new(delay)),
        timeout: TimeoutSlot::new(),
        closure: RefCell::new(None),
    });

    let weak: Weak<DebouncedInner<A>> = Rc::downgrade(&inner);
    let closure = Closure::wrap(Box::new(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.timeout.fired();
        // The browser timer is the authority on elapsed time.
        let args = inner.state.borrow_mut().fire();
        if let Some(args) = args {
            (inner.action.borrow_mut())(args);
        }
    }) as Box<dyn FnMut()>);
    *inner.closure.borrow_mut() = Some(closure);

    Debounced { inner }
}

impl<A: 'static> Debounced<A> {
    /// Records a call, superseding any pending one.
    pub fn call(&self, args: A) {
        let delay = {
            let mut state = self.inner.state.borrow_mut();
            state.call(crate::now(), args);
            state.delay()
        };
        if let Some(closure) = self.inner.closure.borrow().as_ref() {
            self.inner.timeout.schedule(closure.as_ref(), delay);
        }
    }

    /// Drops the pending invocation without running it.
    pub fn cancel(&self) {
        self.inner.timeout.clear();
        self.inner.state.borrow_mut().cancel();
    }

    /// Returns `true` if an invocation is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().is_pending()
    }
}

impl<A: 'static> Drop for Debounced<A> {
    fn drop(&mut self) {
        self.cancel();
        self.inner.closure.borrow_mut().take();
    }
}

impl<A: 'static> core::fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.inner.state.borrow().delay())
            .field("pending", &self.is_pending())
            .finish()
    }
}
