// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One observation session per loaded document.
//!
//! A [`Session`] owns everything with a lifetime bounded by one load: the
//! access guard, the quiet-period clock, the settle timer and the debounce
//! token. Its phases:
//!
//! ```text
//!   Unstable ──quiet period──► Stabilizing ──settle──► Steady
//!      │                            │                     │
//!      └────────── boundary denied ─┴─────────────────────┴──► Inert
//! ```
//!
//! While `Stabilizing` no subscription is wanted, so the long-lived observer
//! cannot fire until the stability sync (including its settle delay) has
//! completed. In `Steady`, a debounced sync that fires while a previous one
//! is still settling restarts it.

use crate::access::AccessGuard;
use crate::backend::{DocumentId, FrameHost, ObserverMode};
use crate::config::SyncConfig;
use crate::error::AccessError;
use crate::observe::ChangeObserver;
use crate::stability::StabilityDetector;
use crate::sync::{HeightSync, SyncOutcome};
use crate::time::HostTime;
use crate::timer::earliest;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for mutations to quiesce.
    Unstable,
    /// Running the one-off stability sync.
    Stabilizing,
    /// Resizing on debounced changes.
    Steady,
    /// Permanently idle (origin boundary hit).
    Inert,
}

/// Counters kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Mutation batches delivered to the session.
    pub mutation_batches: u64,
    /// Explicit heights written to the host.
    pub heights_applied: u64,
    /// Syncs abandoned because the content became unreachable.
    pub syncs_aborted: u64,
}

/// The observation lifecycle of one loaded document.
#[derive(Clone, Debug)]
pub struct Session {
    document: DocumentId,
    phase: Phase,
    guard: AccessGuard,
    stability: StabilityDetector,
    sync: HeightSync,
    changes: ChangeObserver,
    stats: SessionStats,
}

impl Session {
    /// Starts a session for `document`; its quiet period begins at `now`.
    #[must_use]
    pub fn start(now: HostTime, config: &SyncConfig, document: DocumentId) -> Self {
        log::debug!("observing {document:?}");
        Self {
            document,
            phase: Phase::Unstable,
            guard: AccessGuard::new(),
            stability: StabilityDetector::start(now, config.quiet_period),
            sync: HeightSync::new(config.settle_delay),
            changes: ChangeObserver::new(config.debounce_delay),
            stats: SessionStats::default(),
        }
    }

    /// Returns the document this session observes.
    #[must_use]
    pub const fn document(&self) -> DocumentId {
        self.document
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` if the session will never resize again.
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        matches!(self.phase, Phase::Inert)
    }

    /// Returns diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Returns the last explicit height applied by this session.
    #[must_use]
    pub const fn last_height(&self) -> Option<u32> {
        self.sync.last_applied()
    }

    /// Delivers one mutation batch observed at `now`.
    pub fn on_mutations(&mut self, now: HostTime) {
        self.stats.mutation_batches += 1;
        match self.phase {
            Phase::Unstable => self.stability.on_mutation(now),
            Phase::Steady => self.changes.on_mutation(now),
            Phase::Stabilizing | Phase::Inert => {}
        }
    }

    /// Runs everything due at `now`.
    ///
    /// Only [`AccessError::Fault`] is returned; environmental failures are
    /// absorbed by the session's guard.
    pub fn poll(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<(), AccessError> {
        while self.step(now, host)? {
            if self.guard.is_inert() {
                break;
            }
        }
        if self.guard.is_inert() && !self.is_inert() {
            self.shutdown();
        }
        Ok(())
    }

    /// Advances by at most one transition. Returns `true` if anything ran.
    fn step(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<bool, AccessError> {
        match self.phase {
            Phase::Inert => Ok(false),
            Phase::Unstable => {
                if !self.stability.poll(now) {
                    return Ok(false);
                }
                self.phase = Phase::Stabilizing;
                if !self.begin_sync(now, host)? {
                    self.enter_steady();
                }
                Ok(true)
            }
            Phase::Stabilizing => match self.sync.poll(now, host, &mut self.guard, self.document)? {
                Some(outcome) => {
                    self.record(outcome);
                    self.enter_steady();
                    Ok(true)
                }
                None => Ok(false),
            },
            Phase::Steady => {
                let mut progressed = false;
                if let Some(outcome) = self.sync.poll(now, host, &mut self.guard, self.document)? {
                    self.record(outcome);
                    progressed = true;
                }
                if self.changes.poll(now) {
                    self.begin_sync(now, host)?;
                    progressed = true;
                }
                Ok(progressed)
            }
        }
    }

    fn begin_sync(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<bool, AccessError> {
        let started = self.sync.begin(now, host, &mut self.guard, self.document)?;
        if !started {
            self.stats.syncs_aborted += 1;
        }
        Ok(started)
    }

    fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Applied(_) => self.stats.heights_applied += 1,
            SyncOutcome::Aborted => self.stats.syncs_aborted += 1,
        }
    }

    fn enter_steady(&mut self) {
        self.phase = Phase::Steady;
        self.changes.activate();
    }

    /// Cancels every pending timer and goes inert.
    pub fn shutdown(&mut self) {
        self.phase = Phase::Inert;
        self.stability.cancel();
        self.sync.cancel();
        self.changes.shutdown();
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        match self.phase {
            Phase::Unstable => self.stability.deadline(),
            Phase::Stabilizing => self.sync.deadline(),
            Phase::Steady => earliest([self.sync.deadline(), self.changes.deadline()]),
            Phase::Inert => None,
        }
    }

    /// Returns which mutation subscription should be connected.
    #[must_use]
    pub const fn observer_mode(&self) -> ObserverMode {
        match self.phase {
            Phase::Unstable => ObserverMode::Provisional,
            Phase::Steady => ObserverMode::LongLived,
            Phase::Stabilizing | Phase::Inert => ObserverMode::Detached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HostHeight, Readiness};
    use crate::testing::FakeFrame;
    use crate::time::Duration;
    use alloc::vec;

    const DOC: DocumentId = DocumentId(7);

    fn ms(t: u64) -> HostTime {
        HostTime::from_millis(t)
    }

    fn steady_session(frame: &mut FakeFrame) -> Session {
        let mut s = Session::start(ms(0), &SyncConfig::DEFAULT, DOC);
        s.poll(ms(1000), frame).unwrap();
        s.poll(ms(1010), frame).unwrap();
        assert_eq!(s.phase(), Phase::Steady);
        s
    }

    #[test]
    fn stability_sync_completes_before_long_lived_observation() {
        let mut frame = FakeFrame::loaded(DOC, 200);
        let mut s = Session::start(ms(0), &SyncConfig::DEFAULT, DOC);
        assert_eq!(s.observer_mode(), ObserverMode::Provisional);
        assert_eq!(s.next_deadline(), Some(ms(1000)));

        s.poll(ms(1000), &mut frame).unwrap();
        assert_eq!(s.phase(), Phase::Stabilizing);
        assert_eq!(s.observer_mode(), ObserverMode::Detached);
        assert_eq!(frame.height(), Some(HostHeight::Auto));

        // A stray batch while stabilizing does not arm a debounced sync.
        s.on_mutations(ms(1005));
        assert_eq!(s.next_deadline(), Some(ms(1010)));

        s.poll(ms(1010), &mut frame).unwrap();
        assert_eq!(s.phase(), Phase::Steady);
        assert_eq!(s.observer_mode(), ObserverMode::LongLived);
        assert_eq!(frame.height(), Some(HostHeight::Px(200)));
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn first_sync_waits_for_mutations_to_pause() {
        let mut frame = FakeFrame::loaded(DOC, 640);
        let mut s = Session::start(ms(0), &SyncConfig::DEFAULT, DOC);

        // Mutations every 300 ms for 4.5 s.
        let mut t = 0;
        while t <= 4500 {
            s.poll(ms(t), &mut frame).unwrap();
            assert!(frame.writes.is_empty(), "resized at {t} ms while unstable");
            s.on_mutations(ms(t));
            t += 300;
        }
        let last = 4500;
        s.poll(ms(last + 999), &mut frame).unwrap();
        assert!(frame.writes.is_empty());
        s.poll(ms(last + 1000), &mut frame).unwrap();
        assert_eq!(frame.writes, vec![HostHeight::Auto]);
    }

    #[test]
    fn rapid_steady_state_mutations_resize_once_with_final_height() {
        let mut frame = FakeFrame::loaded(DOC, 200);
        let mut s = steady_session(&mut frame);
        let before = frame.writes.len();

        for i in 0..10 {
            let now = ms(2000 + i * 10);
            s.poll(now, &mut frame).unwrap();
            frame.scroll_height = 300 + u32::try_from(i).unwrap();
            s.on_mutations(now);
        }
        // Last batch at 2090: debounce fires at 2190, settles at 2200.
        let mut t = 2090;
        while t <= 2400 {
            s.poll(ms(t), &mut frame).unwrap();
            t += 1;
        }
        assert_eq!(frame.writes[before..], [HostHeight::Auto, HostHeight::Px(309)]);
        assert_eq!(s.stats().heights_applied, 2);
    }

    #[test]
    fn debounced_sync_restarts_one_still_settling() {
        let config = SyncConfig {
            settle_delay: Duration::from_millis(50),
            debounce_delay: Duration::from_millis(20),
            ..SyncConfig::DEFAULT
        };
        let mut frame = FakeFrame::loaded(DOC, 100);
        let mut s = Session::start(ms(0), &config, DOC);
        s.poll(ms(1000), &mut frame).unwrap();
        s.poll(ms(1050), &mut frame).unwrap();

        s.on_mutations(ms(2000));
        s.poll(ms(2020), &mut frame).unwrap(); // auto, settle due 2070
        s.on_mutations(ms(2030));
        frame.scroll_height = 150;
        s.poll(ms(2050), &mut frame).unwrap(); // restarted, settle due 2100
        s.poll(ms(2070), &mut frame).unwrap();
        assert_eq!(frame.px_writes(), vec![100]);
        s.poll(ms(2100), &mut frame).unwrap();
        assert_eq!(frame.px_writes(), vec![100, 150]);
    }

    #[test]
    fn restarted_sync_with_content_gone_keeps_last_height() {
        let config = SyncConfig {
            settle_delay: Duration::from_millis(50),
            debounce_delay: Duration::from_millis(20),
            ..SyncConfig::DEFAULT
        };
        let mut frame = FakeFrame::loaded(DOC, 100);
        let mut s = Session::start(ms(0), &config, DOC);
        s.poll(ms(1000), &mut frame).unwrap();
        s.poll(ms(1050), &mut frame).unwrap();
        assert_eq!(frame.height(), Some(HostHeight::Px(100)));

        s.on_mutations(ms(2000));
        s.poll(ms(2020), &mut frame).unwrap(); // auto, settle due 2070
        assert_eq!(frame.height(), Some(HostHeight::Auto));
        s.on_mutations(ms(2030));
        frame.readiness = Readiness::NotReady;
        for t in (2050..=3000).step_by(10) {
            s.poll(ms(t), &mut frame).unwrap();
        }
        assert_eq!(frame.height(), Some(HostHeight::Px(100)));
        assert_eq!(s.last_height(), Some(100));
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn boundary_denial_goes_inert_and_stops_syncing() {
        let mut frame = FakeFrame::loaded(DOC, 200);
        let mut s = steady_session(&mut frame);
        let writes = frame.writes.len();

        frame.readiness = Readiness::BoundaryDenied;
        s.on_mutations(ms(2000));
        s.poll(ms(2100), &mut frame).unwrap();
        assert!(s.is_inert());
        assert_eq!(s.next_deadline(), None);
        assert_eq!(s.observer_mode(), ObserverMode::Detached);

        s.on_mutations(ms(3000));
        s.poll(ms(4000), &mut frame).unwrap();
        assert_eq!(frame.writes.len(), writes);
    }

    #[test]
    fn zero_settle_delay_completes_in_one_poll() {
        let config = SyncConfig {
            settle_delay: Duration::ZERO,
            ..SyncConfig::DEFAULT
        };
        let mut frame = FakeFrame::loaded(DOC, 90);
        let mut s = Session::start(ms(0), &config, DOC);
        s.poll(ms(1000), &mut frame).unwrap();
        assert_eq!(s.phase(), Phase::Steady);
        assert_eq!(s.last_height(), Some(90));
    }

    #[test]
    fn write_fault_escapes_poll() {
        let mut frame = FakeFrame::loaded(DOC, 200);
        frame.fail_writes = true;
        let mut s = Session::start(ms(0), &SyncConfig::DEFAULT, DOC);
        assert!(matches!(s.poll(ms(1000), &mut frame), Err(AccessError::Fault(_))));
    }
}
