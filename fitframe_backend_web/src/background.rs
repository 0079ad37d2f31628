// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background-color inheritance for embedded content.
//!
//! Copies the parent page body's computed `background-color` onto the
//! content body, once if the content is already loaded and again on every
//! `load`. Uses the same readiness probe and [`AccessGuard`] as the resize
//! pipeline, so cross-origin content is reported once per attempt and never
//! throws.

use alloc::boxed::Box;
use alloc::string::{String, ToString as _};

use fitframe_core::access::AccessGuard;
use fitframe_core::error::AccessError;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlIFrameElement};

use crate::host::{content_body, content_is_loaded, fault};

/// Makes `iframe`'s content inherit the parent page's background color.
///
/// Registers an additional `load` listener that lives as long as the page.
#[wasm_bindgen(js_name = "inheritBackgroundColor")]
pub fn inherit_background_color(iframe: &HtmlIFrameElement) {
    if let Err(e) = try_inherit_background_color(iframe) {
        log::error!("failed to inherit background color: {e:?}");
    }
}

fn try_inherit_background_color(iframe: &HtmlIFrameElement) -> Result<(), JsValue> {
    let mut guard = AccessGuard::new();
    if guard
        .with_access(|| content_is_loaded(iframe))
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        == Some(true)
    {
        apply(iframe)?;
    }

    let target = iframe.clone();
    let on_load = Closure::wrap(Box::new(move |_event: Event| apply(&target))
        as Box<dyn FnMut(Event) -> Result<(), JsValue>>);
    iframe.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    on_load.forget();
    Ok(())
}

/// Copies the color once. Environmental failures are logged by the guard.
fn apply(iframe: &HtmlIFrameElement) -> Result<(), JsValue> {
    let mut guard = AccessGuard::new();
    guard
        .with_access(|| {
            let body = content_body(iframe)?;
            let color = parent_background_color()?;
            body.style()
                .set_property("background-color", &color)
                .map_err(|e| fault(&e))
        })
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parent_background_color() -> Result<String, AccessError> {
    let window = web_sys::window().ok_or(AccessError::NotReady)?;
    let body = window
        .document()
        .and_then(|document| document.body())
        .ok_or(AccessError::NotReady)?;
    let style = window
        .get_computed_style(&body)
        .map_err(|e| fault(&e))?
        .ok_or(AccessError::NotReady)?;
    style
        .get_property_value("background-color")
        .map_err(|e| fault(&e))
}
