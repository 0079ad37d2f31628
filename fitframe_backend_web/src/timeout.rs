// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` handles.
//!
//! A [`TimeoutSlot`] holds at most one scheduled browser timeout. Scheduling
//! clears the previous one first, and clearing is the only cancellation.

use core::cell::Cell;

use fitframe_core::time::Duration;
use wasm_bindgen::prelude::*;

// Direct global bindings, as with `requestAnimationFrame`: no need to fetch
// the `Window` for every reschedule.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(handler: &JsValue, timeout: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Converts a delay into the millisecond argument `setTimeout` expects.
pub(crate) fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis_ceil()).unwrap_or(i32::MAX)
}

/// One owned, replaceable browser timeout.
#[derive(Debug, Default)]
pub(crate) struct TimeoutSlot {
    id: Cell<Option<i32>>,
}

impl TimeoutSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Schedules `handler` after `delay`, replacing any pending timeout.
    pub(crate) fn schedule(&self, handler: &JsValue, delay: Duration) {
        self.clear();
        let id = set_timeout(handler, timeout_millis(delay));
        self.id.set(Some(id));
    }

    /// Cancels the pending timeout, if any.
    pub(crate) fn clear(&self) {
        if let Some(id) = self.id.take() {
            clear_timeout(id);
        }
    }

    /// Marks the pending timeout as having run.
    pub(crate) fn fired(&self) {
        self.id.set(None);
    }
}
