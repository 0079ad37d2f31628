// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sans-I/O control loop that keeps a host element's height matched to the
//! rendered height of the content it embeds.
//!
//! `fitframe_core` owns every decision about *when* to resize and *what* to
//! resize to. It never touches a DOM, a timer API or a clock: callers feed it
//! explicit [`HostTime`](time::HostTime) values and platform events, ask it
//! for its next deadline, and let it drive a [`FrameHost`](backend::FrameHost)
//! implementation. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   load event / attach ──► Attachment ──(AccessGuard)──► Session
//!                                                            │
//!            mutation batches ──► StabilityDetector ─────────┤ quiet period expires
//!                                                            ▼
//!                                                HeightSync (auto → settle → px)
//!                                                            │ settle resolves
//!                                                            ▼
//!            mutation batches ──► ChangeObserver (debounced HeightSync, ongoing)
//! ```
//!
//! **[`attach`]** — The load orchestrator. Starts, de-duplicates and replaces
//! observation sessions as content loads.
//!
//! **[`session`]** — One observation session per loaded document, owning all
//! of its timers and its access guard.
//!
//! **[`stability`]** — Quiet-period detection for the initial population of
//! freshly loaded content.
//!
//! **[`sync`]** — The two-step height synchronizer.
//!
//! **[`observe`]** — The long-lived, debounced change observer.
//!
//! **[`debounce`]** — Generic last-call-wins coalescer.
//!
//! **[`access`]** — The access guard that turns environmental failures into
//! non-fatal outcomes.
//!
//! **[`backend`]** — The [`FrameHost`](backend::FrameHost) trait platform
//! backends implement.
//!
//! **[`compose`]** — Helpers for applying several per-element initializers to
//! the same element.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod access;
pub mod attach;
pub mod backend;
pub mod compose;
pub mod config;
pub mod debounce;
pub mod error;
pub mod observe;
pub mod session;
pub mod stability;
pub mod sync;
pub mod time;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;
