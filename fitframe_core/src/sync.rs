// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two-step height synchronizer.
//!
//! 1. [`begin`](HeightSync::begin) writes `height: auto` to the host so the
//!    engine drops any cached explicit height, then arms the settle timer.
//! 2. When the settle timer expires, [`poll`](HeightSync::poll) re-validates
//!    that the same document is still reachable, reads its scroll height and
//!    writes it back as an explicit pixel height.
//!
//! Auto-reset and reflow are not synchronous in every engine, hence the
//! settle delay. If the content goes away between the steps the write is
//! skipped and the host goes back to the last height this synchronizer
//! applied, if any.

use crate::access::AccessGuard;
use crate::backend::{DocumentId, FrameHost, HostHeight};
use crate::error::AccessError;
use crate::time::{Duration, HostTime};
use crate::timer::Timer;

/// What a completed settle step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The host now has this explicit pixel height.
    Applied(u32),
    /// The content was unreachable; nothing new was applied.
    Aborted,
}

/// Resize primitive with an owned settle timer.
#[derive(Clone, Debug)]
pub struct HeightSync {
    settle_delay: Duration,
    settle: Timer,
    last_applied: Option<u32>,
}

impl HeightSync {
    /// Creates an idle synchronizer.
    #[must_use]
    pub const fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            settle: Timer::new(),
            last_applied: None,
        }
    }

    /// Resets the host to `auto` and arms the settle timer.
    ///
    /// Restarts an in-flight sync. Returns `Ok(false)` if the content was not
    /// reachable. The host is then left untouched, unless a restarted sync had
    /// already reset it to `auto`, in which case the last applied height is
    /// put back.
    pub fn begin(
        &mut self,
        now: HostTime,
        host: &mut impl FrameHost,
        guard: &mut AccessGuard,
        doc: DocumentId,
    ) -> Result<bool, AccessError> {
        if guard.probe_same(&*host, doc)?.is_none() {
            self.abandon(host)?;
            return Ok(false);
        }
        if guard
            .with_access(|| host.set_height(HostHeight::Auto))?
            .is_none()
        {
            self.abandon(host)?;
            return Ok(false);
        }
        self.settle.arm(now, self.settle_delay);
        Ok(true)
    }

    /// Drops a pending settle step, restoring the last height if the host was
    /// left at `auto` by it.
    fn abandon(&mut self, host: &mut impl FrameHost) -> Result<(), AccessError> {
        if self.settle.cancel()
            && let Some(last) = self.last_applied
        {
            absorb(host.set_height(HostHeight::Px(last)))?;
            log::debug!("restarted sync aborted, host height restored to {last}px");
        }
        Ok(())
    }

    /// Completes the sync if the settle delay has elapsed.
    pub fn poll(
        &mut self,
        now: HostTime,
        host: &mut impl FrameHost,
        guard: &mut AccessGuard,
        doc: DocumentId,
    ) -> Result<Option<SyncOutcome>, AccessError> {
        if !self.settle.take_if_due(now) {
            return Ok(None);
        }
        self.finish(host, guard, doc).map(Some)
    }

    fn finish(
        &mut self,
        host: &mut impl FrameHost,
        guard: &mut AccessGuard,
        doc: DocumentId,
    ) -> Result<SyncOutcome, AccessError> {
        let measured = guard.with_access(|| {
            ensure_same_document(&*host, doc)?;
            host.content_height()
        })?;

        let Some(px) = measured else {
            if let Some(last) = self.last_applied {
                absorb(host.set_height(HostHeight::Px(last)))?;
            }
            return Ok(SyncOutcome::Aborted);
        };

        if guard
            .with_access(|| host.set_height(HostHeight::Px(px)))?
            .is_none()
        {
            return Ok(SyncOutcome::Aborted);
        }
        self.last_applied = Some(px);
        log::debug!("host height set to {px}px");
        Ok(SyncOutcome::Applied(px))
    }

    /// Drops a pending settle step.
    pub fn cancel(&mut self) {
        self.settle.cancel();
    }

    /// Returns `true` while waiting for the settle delay.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.settle.is_armed()
    }

    /// Returns when the pending settle step becomes due.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.settle.deadline()
    }

    /// Returns the last explicit height this synchronizer applied.
    #[must_use]
    pub const fn last_applied(&self) -> Option<u32> {
        self.last_applied
    }
}

/// Fails with [`AccessError::Detached`] unless `doc` is still the content.
fn ensure_same_document(host: &impl FrameHost, doc: DocumentId) -> Result<(), AccessError> {
    match host.readiness().into_result() {
        Ok(id) if id == doc => Ok(()),
        Ok(_) | Err(AccessError::NotReady) => Err(AccessError::Detached),
        Err(e) => Err(e),
    }
}

/// Keeps only faults from a host-side write.
fn absorb(result: Result<(), AccessError>) -> Result<(), AccessError> {
    match result {
        Err(e) if !e.is_environmental() => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Readiness;
    use crate::testing::FakeFrame;
    use alloc::vec;

    const DOC: DocumentId = DocumentId(1);
    const SETTLE: Duration = Duration::from_millis(10);

    fn run(sync: &mut HeightSync, frame: &mut FakeFrame, guard: &mut AccessGuard, at_ms: u64) {
        let start = HostTime::from_millis(at_ms);
        assert_eq!(sync.begin(start, frame, guard, DOC), Ok(true));
        assert_eq!(sync.poll(start + Duration::from_millis(9), frame, guard, DOC), Ok(None));
        assert!(
            sync.poll(start + SETTLE, frame, guard, DOC).unwrap().is_some(),
            "settle step runs at the deadline"
        );
    }

    #[test]
    fn resets_to_auto_then_applies_scroll_height() {
        let mut frame = FakeFrame::loaded(DOC, 200);
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);

        assert_eq!(sync.begin(HostTime(0), &mut frame, &mut guard, DOC), Ok(true));
        assert_eq!(frame.height(), Some(HostHeight::Auto));
        assert!(sync.is_settling());

        let done = sync.poll(HostTime::from_millis(10), &mut frame, &mut guard, DOC);
        assert_eq!(done, Ok(Some(SyncOutcome::Applied(200))));
        assert_eq!(frame.height(), Some(HostHeight::Px(200)));
        assert_eq!(frame.writes, vec![HostHeight::Auto, HostHeight::Px(200)]);
    }

    #[test]
    fn repeated_syncs_converge_on_same_height() {
        let mut frame = FakeFrame::loaded(DOC, 480);
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);

        run(&mut sync, &mut frame, &mut guard, 0);
        run(&mut sync, &mut frame, &mut guard, 50);
        run(&mut sync, &mut frame, &mut guard, 100);
        assert_eq!(frame.px_writes(), vec![480, 480, 480]);
        assert_eq!(sync.last_applied(), Some(480));
    }

    #[test]
    fn detached_between_steps_restores_last_height() {
        let mut frame = FakeFrame::loaded(DOC, 300);
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);
        run(&mut sync, &mut frame, &mut guard, 0);

        assert_eq!(sync.begin(HostTime::from_millis(100), &mut frame, &mut guard, DOC), Ok(true));
        frame.readiness = Readiness::NotReady;
        let done = sync.poll(HostTime::from_millis(110), &mut frame, &mut guard, DOC);
        assert_eq!(done, Ok(Some(SyncOutcome::Aborted)));
        assert_eq!(frame.height(), Some(HostHeight::Px(300)));
        assert!(!guard.is_inert());
    }

    #[test]
    fn restart_with_content_gone_restores_last_height() {
        let mut frame = FakeFrame::loaded(DOC, 300);
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);
        run(&mut sync, &mut frame, &mut guard, 0);

        assert_eq!(sync.begin(HostTime::from_millis(100), &mut frame, &mut guard, DOC), Ok(true));
        assert_eq!(frame.height(), Some(HostHeight::Auto));
        frame.readiness = Readiness::NotReady;
        assert_eq!(sync.begin(HostTime::from_millis(105), &mut frame, &mut guard, DOC), Ok(false));
        assert_eq!(frame.height(), Some(HostHeight::Px(300)));
        assert!(!sync.is_settling());
    }

    #[test]
    fn unreachable_content_leaves_host_untouched() {
        let mut frame = FakeFrame::loading();
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);

        assert_eq!(sync.begin(HostTime(0), &mut frame, &mut guard, DOC), Ok(false));
        assert!(frame.writes.is_empty());
        assert!(!sync.is_settling());
    }

    #[test]
    fn write_fault_propagates() {
        let mut frame = FakeFrame::loaded(DOC, 300);
        frame.fail_writes = true;
        let mut guard = AccessGuard::new();
        let mut sync = HeightSync::new(SETTLE);

        let r = sync.begin(HostTime(0), &mut frame, &mut guard, DOC);
        assert!(matches!(r, Err(AccessError::Fault(_))));
    }
}
