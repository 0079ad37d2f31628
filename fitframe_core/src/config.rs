// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing configuration for an attachment.

use crate::error::ConfigError;
use crate::time::Duration;

/// Delays that shape the resize control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// How long freshly loaded content must go without a mutation before it
    /// is considered stable.
    pub quiet_period: Duration,
    /// Debounce delay of the long-lived change observer. Must be shorter than
    /// [`quiet_period`](Self::quiet_period).
    pub debounce_delay: Duration,
    /// Delay between resetting the host to `auto` and reading the content
    /// height, giving the engine time to reflow.
    pub settle_delay: Duration,
}

impl SyncConfig {
    /// 1000 ms quiet period, 100 ms debounce, 10 ms settle.
    pub const DEFAULT: Self = Self {
        quiet_period: Duration::from_millis(1000),
        debounce_delay: Duration::from_millis(100),
        settle_delay: Duration::from_millis(10),
    };

    /// Preset for content that keeps changing after it settles (live feeds,
    /// expanding widgets): same stability gate, snappier steady state.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            debounce_delay: Duration::from_millis(50),
            ..Self::DEFAULT
        }
    }

    /// Preset for content that injects large blocks late: longer stability
    /// gate and a slower steady-state debounce.
    #[must_use]
    pub const fn late_loading() -> Self {
        Self {
            quiet_period: Duration::from_millis(2000),
            debounce_delay: Duration::from_millis(250),
            ..Self::DEFAULT
        }
    }

    /// Checks the delays are mutually consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet_period == Duration::ZERO {
            return Err(ConfigError::ZeroQuietPeriod);
        }
        if self.debounce_delay >= self.quiet_period {
            return Err(ConfigError::DebounceNotShorter {
                debounce_ms: self.debounce_delay.as_millis_ceil(),
                quiet_ms: self.quiet_period.as_millis_ceil(),
            });
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
