// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event plumbing between an `<iframe>` and the core [`Attachment`].
//!
//! [`FrameSync`] owns the three browser resources an attachment needs: an
//! additive `load` listener, one `setTimeout` re-armed at the core's next
//! deadline, and one `MutationObserver` reconciled against the core's
//! [`ObserverMode`]. Every event is handled the same way:
//!
//! 1. feed the event to the attachment,
//! 2. [`poll`](Attachment::poll) it at the current time,
//! 3. reconcile the observer, then reschedule the timeout.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::ToString as _;
use core::cell::RefCell;

use fitframe_core::attach::Attachment;
use fitframe_core::backend::ObserverMode;
use fitframe_core::config::SyncConfig;
use fitframe_core::error::AccessError;
use js_sys::Array;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlIFrameElement, MutationObserver, MutationObserverInit};

use crate::host::IframeHost;
use crate::timeout::TimeoutSlot;

type LoadClosure = Closure<dyn FnMut(Event) -> Result<(), JsValue>>;
type TimeoutClosure = Closure<dyn FnMut() -> Result<(), JsValue>>;
type MutationClosure = Closure<dyn FnMut(Array, MutationObserver) -> Result<(), JsValue>>;

/// A live height-synchronization attachment on one `<iframe>`.
///
/// Dropping it removes its `load` listener, disconnects its observer and
/// clears its timeout. Use [`forget`](Self::forget) to keep it alive for the
/// rest of the page's life.
pub struct FrameSync {
    inner: Rc<Inner>,
}

struct Subscription {
    mode: ObserverMode,
    target: Element,
    observer: MutationObserver,
}

struct Inner {
    host: RefCell<IframeHost>,
    attachment: RefCell<Attachment>,
    timeout: TimeoutSlot,
    subscription: RefCell<Option<Subscription>>,
    on_load: RefCell<Option<LoadClosure>>,
    on_timeout: RefCell<Option<TimeoutClosure>>,
    on_mutations: RefCell<Option<MutationClosure>>,
}

/// Attaches height synchronization to `iframe`.
///
/// Starts observing immediately if the content has already loaded, and on
/// every later `load` event. Existing `load` listeners are left alone.
pub fn attach(iframe: &HtmlIFrameElement, config: SyncConfig) -> Result<FrameSync, JsValue> {
    let attachment = Attachment::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let inner = Rc::new(Inner {
        host: RefCell::new(IframeHost::new(iframe.clone())),
        attachment: RefCell::new(attachment),
        timeout: TimeoutSlot::new(),
        subscription: RefCell::new(None),
        on_load: RefCell::new(None),
        on_timeout: RefCell::new(None),
        on_mutations: RefCell::new(None),
    });

    let weak = Rc::downgrade(&inner);
    let on_load = Closure::wrap(Box::new(move |_event: Event| {
        with_inner(&weak, |inner| {
            inner.dispatch(|attachment, host| attachment.on_load(crate::now(), host))
        })
    }) as Box<dyn FnMut(Event) -> Result<(), JsValue>>);

    let weak = Rc::downgrade(&inner);
    let on_timeout = Closure::wrap(Box::new(move || {
        with_inner(&weak, |inner| {
            inner.timeout.fired();
            inner.pump()
        })
    }) as Box<dyn FnMut() -> Result<(), JsValue>>);

    let weak = Rc::downgrade(&inner);
    let on_mutations = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
        with_inner(&weak, |inner| {
            inner.attachment.borrow_mut().on_mutations(crate::now());
            inner.pump()
        })
    })
        as Box<dyn FnMut(Array, MutationObserver) -> Result<(), JsValue>>);

    iframe.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
    *inner.on_load.borrow_mut() = Some(on_load);
    *inner.on_timeout.borrow_mut() = Some(on_timeout);
    *inner.on_mutations.borrow_mut() = Some(on_mutations);

    // Constructed first so a failed initial dispatch still unregisters.
    let sync = FrameSync { inner };
    sync.inner
        .dispatch(|attachment, host| attachment.attach(crate::now(), host))?;
    Ok(sync)
}

fn with_inner(
    weak: &Weak<Inner>,
    f: impl FnOnce(&Inner) -> Result<(), JsValue>,
) -> Result<(), JsValue> {
    match weak.upgrade() {
        Some(inner) => f(&inner),
        None => Ok(()),
    }
}

fn to_js(error: &AccessError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

impl Inner {
    /// Feeds one event to the attachment, then pumps.
    fn dispatch(
        &self,
        event: impl FnOnce(&mut Attachment, &mut IframeHost) -> Result<(), AccessError>,
    ) -> Result<(), JsValue> {
        {
            let mut attachment = self.attachment.borrow_mut();
            let mut host = self.host.borrow_mut();
            event(&mut *attachment, &mut *host).map_err(|e| to_js(&e))?;
        }
        self.pump()
    }

    /// Runs what is due, then brings the observer and timeout in line.
    fn pump(&self) -> Result<(), JsValue> {
        let now = crate::now();
        {
            let mut attachment = self.attachment.borrow_mut();
            let mut host = self.host.borrow_mut();
            attachment.poll(now, &mut *host).map_err(|e| to_js(&e))?;
        }
        self.reconcile_observer()?;

        let deadline = self.attachment.borrow().next_deadline();
        match (deadline, self.on_timeout.borrow().as_ref()) {
            (Some(deadline), Some(handler)) => {
                self.timeout
                    .schedule(handler.as_ref(), deadline.saturating_duration_since(now));
            }
            _ => self.timeout.clear(),
        }
        Ok(())
    }

    fn reconcile_observer(&self) -> Result<(), JsValue> {
        let mode = self.attachment.borrow().observer_mode();
        let target = if mode.is_observing() {
            self.host.borrow().observation_target()
        } else {
            None
        };

        let mut subscription = self.subscription.borrow_mut();
        if let (Some(current), Some(target)) = (subscription.as_ref(), target.as_ref())
            && current.mode == mode
            && js_sys::Object::is(&current.target, target)
        {
            return Ok(());
        }

        if let Some(old) = subscription.take() {
            old.observer.disconnect();
            log::debug!("disconnected {:?} observer", old.mode);
        }
        let callback: Option<js_sys::Function> = self
            .on_mutations
            .borrow()
            .as_ref()
            .map(|closure| closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
        let (Some(target), Some(callback)) = (target, callback) else {
            return Ok(());
        };

        let observer = MutationObserver::new(&callback)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_attributes(true);
        init.set_subtree(true);
        init.set_character_data(true);
        observer.observe_with_options(&target, &init)?;
        log::debug!("connected {mode:?} observer");
        *subscription = Some(Subscription {
            mode,
            target,
            observer,
        });
        Ok(())
    }
}

impl FrameSync {
    /// Returns how many observation sessions have been started.
    #[must_use]
    pub fn sessions_started(&self) -> u64 {
        self.inner.attachment.borrow().sessions_started()
    }

    /// Returns the last explicit height applied in the active session.
    #[must_use]
    pub fn last_height(&self) -> Option<u32> {
        self.inner
            .attachment
            .borrow()
            .session()
            .and_then(|session| session.last_height())
    }

    /// Keeps the attachment alive for the rest of the page's life.
    pub fn forget(self) {
        core::mem::forget(self);
    }
}

impl Drop for FrameSync {
    fn drop(&mut self) {
        if let Some(on_load) = self.inner.on_load.borrow_mut().take() {
            if let Err(e) = self
                .inner
                .host
                .borrow()
                .iframe()
                .remove_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
            {
                log::debug!("failed to remove load listener: {e:?}");
            }
        }
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.observer.disconnect();
        }
        self.inner.timeout.clear();
        self.inner.on_timeout.borrow_mut().take();
        self.inner.on_mutations.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameSync {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameSync")
            .field("host", &self.inner.host.borrow())
            .field("observer_mode", &self.inner.attachment.borrow().observer_mode())
            .field("next_deadline", &self.inner.attachment.borrow().next_deadline())
            .finish()
    }
}
