// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based call coalescing.
//!
//! [`Debouncer`] holds at most one pending invocation. Each
//! [`call`](Debouncer::call) replaces the pending one (arguments included)
//! and pushes its deadline out to `now + delay`; the invocation comes out of
//! [`poll`](Debouncer::poll) once that deadline passes without a further
//! call. A burst of calls spaced closer than the delay therefore yields
//! exactly one invocation, carrying the last call's arguments.

use crate::time::{Duration, HostTime};
use crate::timer::Timer;

/// Last-call-wins coalescer over explicit time.
#[derive(Clone, Debug)]
pub struct Debouncer<A> {
    delay: Duration,
    timer: Timer,
    pending: Option<A>,
}

impl<A> Debouncer<A> {
    /// Creates an idle debouncer with the given quiet window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Timer::new(),
            pending: None,
        }
    }

    /// Returns the quiet window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a call at `now`, superseding any pending one.
    pub fn call(&mut self, now: HostTime, args: A) {
        self.pending = Some(args);
        self.timer.arm(now, self.delay);
    }

    /// Returns the pending arguments if their quiet window has elapsed.
    pub fn poll(&mut self, now: HostTime) -> Option<A> {
        if self.timer.take_if_due(now) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Takes the pending arguments regardless of the deadline.
    ///
    /// For backends whose timer expiry is itself the authority on elapsed
    /// time.
    pub fn fire(&mut self) -> Option<A> {
        self.timer.cancel();
        self.pending.take()
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&mut self) -> Option<A> {
        self.timer.cancel();
        self.pending.take()
    }

    /// Returns when the pending invocation becomes due.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.timer.deadline()
    }

    /// Returns `true` if an invocation is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
