// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

/// Why embedded content could not be read or written.
///
/// Only [`Fault`](Self::Fault) is a programming error; the other variants are
/// environmental and are absorbed by the
/// [`AccessGuard`](crate::access::AccessGuard).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The content document or its body is not reachable yet.
    #[error("embedded content is not reachable yet")]
    NotReady,
    /// An origin boundary forbids access to the content.
    #[error("embedded content is behind an origin boundary")]
    BoundaryDenied,
    /// The content or host went away between two steps of an operation.
    #[error("embedded content was detached during the operation")]
    Detached,
    /// Any other failure. Never swallowed.
    #[error("unexpected failure touching embedded content: {0}")]
    Fault(String),
}

impl AccessError {
    /// Returns `true` for the environmental conditions the access guard
    /// absorbs.
    #[must_use]
    pub const fn is_environmental(&self) -> bool {
        !matches!(self, Self::Fault(_))
    }
}

/// A [`SyncConfig`](crate::config::SyncConfig) whose delays are inconsistent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The quiet period is zero, so content would be "stable" immediately.
    #[error("quiet period must be non-zero")]
    ZeroQuietPeriod,
    /// The steady-state debounce is not shorter than the stability threshold.
    #[error("debounce delay ({debounce_ms} ms) must be shorter than the quiet period ({quiet_ms} ms)")]
    DebounceNotShorter {
        /// Configured debounce delay, in milliseconds.
        debounce_ms: u64,
        /// Configured quiet period, in milliseconds.
        quiet_ms: u64,
    },
}
