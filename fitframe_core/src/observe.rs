// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-lived, debounced change observation.
//!
//! Once content is stable every mutation batch is a steady-state change, so
//! [`ChangeObserver`] only needs a short [`Debouncer`] in front of the height
//! synchronizer. It stays active for the rest of the session.

use crate::debounce::Debouncer;
use crate::time::{Duration, HostTime};

/// Debounced trigger for steady-state resizes.
#[derive(Clone, Debug)]
pub struct ChangeObserver {
    active: bool,
    debounce: Debouncer<()>,
}

impl ChangeObserver {
    /// Creates an inactive observer.
    #[must_use]
    pub const fn new(debounce_delay: Duration) -> Self {
        Self {
            active: false,
            debounce: Debouncer::new(debounce_delay),
        }
    }

    /// Starts accepting mutation batches.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Returns `true` once activated.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Records a mutation batch. Ignored until activated.
    pub fn on_mutation(&mut self, now: HostTime) {
        if self.active {
            self.debounce.call(now, ());
        }
    }

    /// Returns `true` when a resize is due.
    pub fn poll(&mut self, now: HostTime) -> bool {
        self.debounce.poll(now).is_some()
    }

    /// Drops any pending resize and stops accepting batches.
    pub fn shutdown(&mut self) {
        self.active = false;
        self.debounce.cancel();
    }

    /// Returns when the pending resize becomes due.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.debounce.deadline()
    }
}
