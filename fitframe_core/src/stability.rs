// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quiet-period detection for freshly loaded content.
//!
//! Right after a load, content often keeps populating itself (late scripts
//! injecting markup in bursts). [`StabilityDetector`] sits on the provisional
//! mutation subscription and does one thing with each batch: push the quiet
//! deadline out. Only when the deadline passes untouched does the content
//! become [`Stability::Stable`], which is terminal for the session.

use crate::time::{Duration, HostTime};
use crate::timer::Timer;

/// Detector state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stability {
    /// Mutations may still be arriving.
    Unstable,
    /// The quiet period elapsed without a mutation.
    Stable,
}

/// Quiet-period clock plus the unstable/stable state machine.
#[derive(Clone, Debug)]
pub struct StabilityDetector {
    quiet_period: Duration,
    clock: Timer,
    last_mutation: Option<HostTime>,
    state: Stability,
}

impl StabilityDetector {
    /// Creates an unstable detector whose quiet period starts at `now`.
    #[must_use]
    pub fn start(now: HostTime, quiet_period: Duration) -> Self {
        let mut clock = Timer::new();
        clock.arm(now, quiet_period);
        Self {
            quiet_period,
            clock,
            last_mutation: None,
            state: Stability::Unstable,
        }
    }

    /// Resets the quiet period after a mutation batch. Ignored once stable.
    pub fn on_mutation(&mut self, now: HostTime) {
        if self.state == Stability::Unstable {
            self.last_mutation = Some(now);
            self.clock.arm(now, self.quiet_period);
        }
    }

    /// Returns `true` exactly once: when the quiet period has expired.
    pub fn poll(&mut self, now: HostTime) -> bool {
        if self.state == Stability::Unstable && self.clock.take_if_due(now) {
            self.state = Stability::Stable;
            log::debug!(
                "content stable after {:?} without mutations",
                self.quiet_period
            );
            true
        } else {
            false
        }
    }

    /// Stops the quiet-period clock without becoming stable.
    pub fn cancel(&mut self) {
        self.clock.cancel();
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> Stability {
        self.state
    }

    /// Returns when the content will be considered stable if nothing else
    /// mutates.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.clock.deadline()
    }

    /// Returns the time of the most recent mutation batch, if any.
    #[must_use]
    pub const fn last_mutation(&self) -> Option<HostTime> {
        self.last_mutation
    }
}
