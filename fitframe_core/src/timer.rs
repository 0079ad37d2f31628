// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned one-shot deadlines.
//!
//! Every pending wait in the control loop (quiet period, settle delay,
//! debounce) is a [`Timer`] owned by the component that armed it. Nothing is
//! scheduled fire-and-forget: cancelling is clearing the deadline, and a
//! cleared timer never fires.

use crate::time::{Duration, HostTime};

/// A cancellable one-shot deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<HostTime>,
}

impl Timer {
    /// Creates a disarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer to expire `delay` after `now`, replacing any earlier
    /// deadline.
    pub fn arm(&mut self, now: HostTime, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Disarms the timer. Returns `true` if it was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns the pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.deadline
    }

    /// Returns `true` if the timer is armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` if the timer is armed and its deadline is not after
    /// `now`.
    #[must_use]
    pub fn is_due(&self, now: HostTime) -> bool {
        self.deadline.is_some_and(|d| d <= now)
    }

    /// Disarms and returns `true` if the timer was due at `now`.
    pub fn take_if_due(&mut self, now: HostTime) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Returns the earliest of a set of optional deadlines.
pub(crate) fn earliest(deadlines: impl IntoIterator<Item = Option<HostTime>>) -> Option<HostTime> {
    deadlines.into_iter().flatten().min()
}
