// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failure boundary around embedded-content access.
//!
//! [`AccessGuard`] runs an accessor and sorts its failures:
//!
//! | Failure                          | Outcome                                  |
//! |----------------------------------|------------------------------------------|
//! | [`NotReady`]                     | `warn!`, `Ok(None)`, no retry            |
//! | [`Detached`]                     | `debug!`, `Ok(None)`                     |
//! | [`BoundaryDenied`]               | `warn!` once, `Ok(None)`, guard is inert |
//! | [`Fault`]                        | `Err`, propagated to the caller          |
//!
//! An inert guard never invokes its accessor again, so every operation of a
//! denied session is a guaranteed no-op.
//!
//! [`NotReady`]: AccessError::NotReady
//! [`Detached`]: AccessError::Detached
//! [`BoundaryDenied`]: AccessError::BoundaryDenied
//! [`Fault`]: AccessError::Fault

use crate::backend::{DocumentId, FrameHost};
use crate::error::AccessError;

/// Per-session failure boundary for content access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessGuard {
    denied: bool,
}

impl AccessGuard {
    /// Creates a live guard.
    #[must_use]
    pub const fn new() -> Self {
        Self { denied: false }
    }

    /// Returns `true` once an origin boundary has been hit.
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        self.denied
    }

    /// Runs `accessor` inside the failure boundary.
    ///
    /// Returns `Ok(Some(_))` on success, `Ok(None)` for any environmental
    /// failure (or if the guard is inert), and `Err` only for
    /// [`AccessError::Fault`].
    pub fn with_access<T>(
        &mut self,
        accessor: impl FnOnce() -> Result<T, AccessError>,
    ) -> Result<Option<T>, AccessError> {
        if self.denied {
            return Ok(None);
        }
        match accessor() {
            Ok(value) => Ok(Some(value)),
            Err(AccessError::NotReady) => {
                log::warn!("embedded content is not ready; waiting for the next load event");
                Ok(None)
            }
            Err(AccessError::Detached) => {
                log::debug!("embedded content detached mid-operation; skipping");
                Ok(None)
            }
            Err(AccessError::BoundaryDenied) => {
                self.denied = true;
                log::warn!(
                    "cannot access embedded content due to an origin boundary; resizing disabled for this load"
                );
                Ok(None)
            }
            Err(fault @ AccessError::Fault(_)) => Err(fault),
        }
    }

    /// Runs the host's readiness predicate inside the boundary.
    pub fn probe(&mut self, host: &impl FrameHost) -> Result<Option<DocumentId>, AccessError> {
        self.with_access(|| host.readiness().into_result())
    }

    /// Probes and additionally requires the content to still be `expected`.
    ///
    /// A different document means the content was replaced under this
    /// operation, which is treated as [`AccessError::Detached`].
    pub fn probe_same(
        &mut self,
        host: &impl FrameHost,
        expected: DocumentId,
    ) -> Result<Option<DocumentId>, AccessError> {
        self.with_access(|| match host.readiness().into_result() {
            Ok(id) if id == expected => Ok(id),
            Ok(_) => Err(AccessError::Detached),
            Err(AccessError::NotReady) => Err(AccessError::Detached),
            Err(e) => Err(e),
        })
    }
}
