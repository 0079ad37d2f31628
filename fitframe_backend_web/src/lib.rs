// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for fitframe.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`IframeHost`]: [`FrameHost`] over an `<iframe>` element
//! - [`attach`] / [`FrameSync`]: `load` listener, `MutationObserver` and
//!   `setTimeout` wiring around the core attachment
//! - [`debounce`] / [`Debounced`]: timer-backed debouncing for any action
//! - [`inherit_background_color`]: the sibling per-frame initializer
//!
//! Host pages typically combine initializers with
//! [`apply_functions`](fitframe_core::compose::apply_functions):
//!
//! ```rust,ignore
//! use fitframe_backend_web::{inherit_background_color, resize_on_content_changes};
//! use fitframe_core::compose::apply_functions;
//!
//! apply_functions(&iframe, &[&resize_on_content_changes, &inherit_background_color]);
//! ```

#![no_std]

extern crate alloc;

mod background;
mod debounce;
mod driver;
mod host;
mod timeout;

pub use background::inherit_background_color;
pub use debounce::{Debounced, debounce};
pub use driver::{FrameSync, attach};
pub use fitframe_core::backend::FrameHost;
pub use host::IframeHost;

use fitframe_core::config::SyncConfig;
use fitframe_core::time::HostTime;
use wasm_bindgen::prelude::*;
use web_sys::HtmlIFrameElement;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    millis_to_host_time(timeout::performance_now())
}

fn millis_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; us fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Keeps `iframe`'s height matched to its content for the rest of the
/// page's life, with the default timings.
///
/// Fire-and-forget: failures to register are logged, never thrown.
#[wasm_bindgen(js_name = "resizeOnContentChanges")]
pub fn resize_on_content_changes(iframe: &HtmlIFrameElement) {
    match attach(iframe, SyncConfig::DEFAULT) {
        Ok(sync) => sync.forget(),
        Err(e) => log::error!("failed to attach height synchronization: {e:?}"),
    }
}
