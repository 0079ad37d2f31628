// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The core never touches a document. A backend crate provides:
//!
//! - **Host** — an implementation of [`FrameHost`] for its embedding element
//!   (e.g. an `<iframe>`): the readiness probe, the content height read and
//!   the host height write.
//!
//! - **Time** — a `now() -> HostTime` free function over the platform's
//!   monotonic clock.
//!
//! - **Event plumbing** — a load listener, a single rescheduled timer armed
//!   at [`Attachment::next_deadline`], and a mutation subscription reconciled
//!   against [`Attachment::observer_mode`] after every event. These differ
//!   too much across platforms to abstract by a trait.
//!
//! [`Attachment::next_deadline`]: crate::attach::Attachment::next_deadline
//! [`Attachment::observer_mode`]: crate::attach::Attachment::observer_mode

use core::fmt;

use crate::error::AccessError;

/// Opaque identity of one loaded content document.
///
/// Backends hand out a new id whenever the embedded document object changes
/// (navigation, reload). Equal ids mean "the same load".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

/// Result of the readiness predicate: can the content be touched right now?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// The document or its body is not reachable yet (or any more).
    NotReady,
    /// An origin boundary forbids access. Does not resolve over time.
    BoundaryDenied,
    /// The content is reachable and is the given document.
    Ready(DocumentId),
}

impl Readiness {
    /// Converts the tri-state into the error taxonomy used by accessors.
    pub const fn into_result(self) -> Result<DocumentId, AccessError> {
        match self {
            Self::NotReady => Err(AccessError::NotReady),
            Self::BoundaryDenied => Err(AccessError::BoundaryDenied),
            Self::Ready(id) => Ok(id),
        }
    }
}

/// Value written to the host's height style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostHeight {
    /// Intrinsic height; discards any cached explicit height.
    Auto,
    /// Explicit height in CSS pixels.
    Px(u32),
}

impl fmt::Display for HostHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Px(px) => write!(f, "{px}px"),
        }
    }
}

/// Which mutation subscription the core wants connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverMode {
    /// No subscription.
    Detached,
    /// The stability detector's provisional subscription.
    Provisional,
    /// The change observer's long-lived subscription.
    LongLived,
}

impl ObserverMode {
    /// Returns `true` if a subscription should be connected.
    #[must_use]
    pub const fn is_observing(self) -> bool {
        !matches!(self, Self::Detached)
    }
}

/// An embedding element and, transitively, the content loaded into it.
///
/// Both browser `<iframe>` hosts and test doubles implement this trait.
/// Every content access reports failures through [`AccessError`]; the core
/// routes them through an [`AccessGuard`](crate::access::AccessGuard).
pub trait FrameHost {
    /// Probes whether the embedded content can be touched right now.
    fn readiness(&self) -> Readiness;

    /// Returns `true` if the current content has finished loading.
    fn is_loaded(&self) -> Result<bool, AccessError>;

    /// Reads the content's scrollable height in CSS pixels.
    fn content_height(&self) -> Result<u32, AccessError>;

    /// Writes the host's height style. Must not alter scroll position or any
    /// other style.
    fn set_height(&mut self, height: HostHeight) -> Result<(), AccessError>;
}
