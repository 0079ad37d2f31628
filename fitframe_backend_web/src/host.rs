// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<iframe>` implementation of [`FrameHost`].
//!
//! `contentDocument` is `null` both before the frame has a browsing context
//! and when the content is cross-origin. The two are told apart by reading
//! `document` off the frame's `WindowProxy` directly: only a cross-origin
//! window throws (a `SecurityError`) on that read.

use alloc::format;
use alloc::string::ToString as _;
use core::cell::{Cell, RefCell};

use fitframe_core::backend::{DocumentId, FrameHost, HostHeight, Readiness};
use fitframe_core::error::AccessError;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement};

/// What a single reachability probe found.
pub(crate) enum Reach {
    /// No document yet, or no browsing context at all.
    Unreachable,
    /// The content window refused access.
    Denied,
    /// The content document, which may not have a body yet.
    Document(Document),
}

/// Probes the frame's content document.
pub(crate) fn reach(iframe: &HtmlIFrameElement) -> Reach {
    if let Some(document) = iframe.content_document() {
        return Reach::Document(document);
    }
    let Some(window) = iframe.content_window() else {
        return Reach::Unreachable;
    };
    match js_sys::Reflect::get(&window, &JsValue::from_str("document")) {
        Err(_) => Reach::Denied,
        Ok(_) => Reach::Unreachable,
    }
}

/// Returns the content body, mapping every failure onto [`AccessError`].
pub(crate) fn content_body(iframe: &HtmlIFrameElement) -> Result<HtmlElement, AccessError> {
    match reach(iframe) {
        Reach::Unreachable => Err(AccessError::NotReady),
        Reach::Denied => Err(AccessError::BoundaryDenied),
        Reach::Document(document) => document.body().ok_or(AccessError::NotReady),
    }
}

/// The synchronous "already loaded" check shared by every initializer.
pub(crate) fn content_is_loaded(iframe: &HtmlIFrameElement) -> Result<bool, AccessError> {
    match reach(iframe) {
        Reach::Unreachable => Ok(false),
        Reach::Denied => Err(AccessError::BoundaryDenied),
        Reach::Document(document) => Ok(document.ready_state() == "complete"),
    }
}

/// Wraps a thrown JS value as a fault.
pub(crate) fn fault(value: &JsValue) -> AccessError {
    AccessError::Fault(format!("{value:?}"))
}

/// An `<iframe>` element acting as the host container.
///
/// Hands out a fresh [`DocumentId`] whenever the content document object
/// changes.
pub struct IframeHost {
    iframe: HtmlIFrameElement,
    known: RefCell<Option<(Document, DocumentId)>>,
    next_id: Cell<u64>,
}

impl core::fmt::Debug for IframeHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IframeHost")
            .field("iframe", &"HtmlIFrameElement")
            .field("known", &self.known.borrow().as_ref().map(|(_, id)| *id))
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl IframeHost {
    /// Wraps `iframe`.
    #[must_use]
    pub fn new(iframe: HtmlIFrameElement) -> Self {
        Self {
            iframe,
            known: RefCell::new(None),
            next_id: Cell::new(1),
        }
    }

    /// Returns the wrapped element.
    #[must_use]
    pub fn iframe(&self) -> &HtmlIFrameElement {
        &self.iframe
    }

    /// Returns the content's root element, the node mutation subscriptions
    /// observe.
    pub(crate) fn observation_target(&self) -> Option<Element> {
        match reach(&self.iframe) {
            Reach::Document(document) => document.document_element(),
            Reach::Unreachable | Reach::Denied => None,
        }
    }

    fn identify(&self, document: &Document) -> DocumentId {
        let mut known = self.known.borrow_mut();
        if let Some((seen, id)) = known.as_ref()
            && js_sys::Object::is(seen, document)
        {
            return *id;
        }
        let id = DocumentId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        *known = Some((document.clone(), id));
        id
    }
}

impl FrameHost for IframeHost {
    fn readiness(&self) -> Readiness {
        match reach(&self.iframe) {
            Reach::Unreachable => Readiness::NotReady,
            Reach::Denied => Readiness::BoundaryDenied,
            Reach::Document(document) => match document.body() {
                Some(_) => Readiness::Ready(self.identify(&document)),
                None => Readiness::NotReady,
            },
        }
    }

    fn is_loaded(&self) -> Result<bool, AccessError> {
        content_is_loaded(&self.iframe)
    }

    fn content_height(&self) -> Result<u32, AccessError> {
        let body = content_body(&self.iframe)?;
        Ok(u32::try_from(body.scroll_height()).unwrap_or(0))
    }

    fn set_height(&mut self, height: HostHeight) -> Result<(), AccessError> {
        self.iframe
            .style()
            .set_property("height", &height.to_string())
            .map_err(|e| fault(&e))
    }
}
