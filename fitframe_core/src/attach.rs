// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The load orchestrator.
//!
//! [`Attachment`] binds the resize pipeline to the content's load lifecycle.
//! A backend calls [`attach`](Attachment::attach) once when it registers its
//! load listener (covering content that finished loading before that), and
//! [`on_load`](Attachment::on_load) from the listener itself.
//!
//! Sessions are keyed by [`DocumentId`]:
//!
//! - a load for the document already under observation is ignored, so the
//!   "already loaded" check and a late load event for the same content never
//!   start two sessions;
//! - a load for any other document replaces the active session;
//! - a load whose content is unreachable drops the active session, since the
//!   document it observed is gone.

use crate::access::AccessGuard;
use crate::backend::{FrameHost, ObserverMode};
use crate::config::SyncConfig;
use crate::error::{AccessError, ConfigError};
use crate::session::Session;
use crate::time::HostTime;

/// Per-host orchestrator owning at most one [`Session`].
#[derive(Clone, Debug)]
pub struct Attachment {
    config: SyncConfig,
    session: Option<Session>,
    sessions_started: u64,
}

impl Attachment {
    /// Creates an orchestrator with no session.
    pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
            sessions_started: 0,
        })
    }

    /// Returns the configuration sessions are started with.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Starts a session right away if the content already finished loading.
    pub fn attach(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<(), AccessError> {
        let mut guard = AccessGuard::new();
        match guard.with_access(|| host.is_loaded())? {
            Some(true) => self.on_load(now, host),
            Some(false) => {
                log::debug!("content still loading; waiting for its load event");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Handles a load event.
    pub fn on_load(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<(), AccessError> {
        let mut guard = AccessGuard::new();
        let Some(doc) = guard.probe(&*host)? else {
            if let Some(old) = self.session.take() {
                log::debug!("dropping session for {:?}", old.document());
            }
            return Ok(());
        };

        if let Some(active) = &self.session {
            if active.document() == doc {
                log::debug!("{doc:?} is already under observation");
                return Ok(());
            }
            log::debug!("{doc:?} supersedes {:?}", active.document());
        }
        self.session = Some(Session::start(now, &self.config, doc));
        self.sessions_started += 1;
        Ok(())
    }

    /// Delivers a mutation batch to the active session.
    pub fn on_mutations(&mut self, now: HostTime) {
        if let Some(session) = &mut self.session {
            session.on_mutations(now);
        }
    }

    /// Runs everything due at `now`.
    pub fn poll(&mut self, now: HostTime, host: &mut impl FrameHost) -> Result<(), AccessError> {
        match &mut self.session {
            Some(session) => session.poll(now, host),
            None => Ok(()),
        }
    }

    /// Returns when [`poll`](Self::poll) next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.session.as_ref().and_then(Session::next_deadline)
    }

    /// Returns which mutation subscription the backend should hold.
    #[must_use]
    pub fn observer_mode(&self) -> ObserverMode {
        self.session
            .as_ref()
            .map_or(ObserverMode::Detached, Session::observer_mode)
    }

    /// Returns the active session.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns how many sessions have been started.
    #[must_use]
    pub const fn sessions_started(&self) -> u64 {
        self.sessions_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DocumentId, HostHeight, Readiness};
    use crate::session::Phase;
    use crate::testing::FakeFrame;
    use alloc::vec;

    fn ms(t: u64) -> HostTime {
        HostTime::from_millis(t)
    }

    fn attachment() -> Attachment {
        Attachment::new(SyncConfig::DEFAULT).unwrap()
    }

    /// Polls every millisecond in `from..=to`.
    fn run(a: &mut Attachment, frame: &mut FakeFrame, from: u64, to: u64) {
        for t in from..=to {
            a.poll(ms(t), frame).unwrap();
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SyncConfig {
            debounce_delay: SyncConfig::DEFAULT.quiet_period,
            ..SyncConfig::DEFAULT
        };
        assert!(Attachment::new(config).is_err());
    }

    #[test]
    fn already_loaded_content_starts_immediately() {
        let mut frame = FakeFrame::loaded(DocumentId(1), 200);
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();
        assert_eq!(a.sessions_started(), 1);
        assert_eq!(a.observer_mode(), ObserverMode::Provisional);
        assert_eq!(a.next_deadline(), Some(ms(1000)));
    }

    #[test]
    fn loading_content_waits_for_load_event() {
        let mut frame = FakeFrame::loading();
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();
        assert!(a.session().is_none());
        assert_eq!(a.next_deadline(), None);

        frame.finish_load(DocumentId(1), 120);
        a.on_load(ms(50), &mut frame).unwrap();
        assert_eq!(a.sessions_started(), 1);
        run(&mut a, &mut frame, 50, 1100);
        assert_eq!(frame.height(), Some(HostHeight::Px(120)));
    }

    #[test]
    fn load_event_for_observed_document_is_deduplicated() {
        let mut frame = FakeFrame::loaded(DocumentId(1), 200);
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();
        a.on_load(ms(5), &mut frame).unwrap();
        assert_eq!(a.sessions_started(), 1);
        assert_eq!(a.next_deadline(), Some(ms(1000)), "quiet period not restarted");
    }

    #[test]
    fn new_document_replaces_session() {
        let mut frame = FakeFrame::loaded(DocumentId(1), 200);
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();
        run(&mut a, &mut frame, 0, 1010);
        assert_eq!(a.session().map(Session::phase), Some(Phase::Steady));

        frame.finish_load(DocumentId(2), 500);
        a.on_load(ms(2000), &mut frame).unwrap();
        assert_eq!(a.sessions_started(), 2);
        assert_eq!(a.session().map(Session::document), Some(DocumentId(2)));
        assert_eq!(a.observer_mode(), ObserverMode::Provisional);

        run(&mut a, &mut frame, 2000, 3010);
        assert_eq!(frame.px_writes(), vec![200, 500]);
    }

    #[test]
    fn unreachable_load_drops_session() {
        let mut frame = FakeFrame::loaded(DocumentId(1), 200);
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();

        frame.readiness = Readiness::NotReady;
        a.on_load(ms(10), &mut frame).unwrap();
        assert!(a.session().is_none());
        run(&mut a, &mut frame, 10, 2000);
        assert!(frame.writes.is_empty());
    }

    #[test]
    fn cross_origin_content_never_escapes_or_resizes() {
        let mut frame = FakeFrame::cross_origin();
        let mut a = attachment();
        assert_eq!(a.attach(ms(0), &mut frame), Ok(()));
        assert_eq!(a.on_load(ms(10), &mut frame), Ok(()));
        a.on_mutations(ms(20));
        run(&mut a, &mut frame, 0, 3000);
        assert!(a.session().is_none());
        assert!(frame.writes.is_empty());
    }

    #[test]
    fn end_to_end_resize_follows_content() {
        let mut frame = FakeFrame::loaded(DocumentId(1), 200);
        let mut a = attachment();
        a.attach(ms(0), &mut frame).unwrap();

        // settle + quiet period + margin
        run(&mut a, &mut frame, 0, 1015);
        assert_eq!(frame.height(), Some(HostHeight::Px(200)));
        assert_eq!(a.observer_mode(), ObserverMode::LongLived);

        frame.scroll_height = 350;
        a.on_mutations(ms(1500));
        // debounce + settle
        run(&mut a, &mut frame, 1500, 1610);
        assert_eq!(frame.height(), Some(HostHeight::Px(350)));
        assert_eq!(
            frame.writes,
            vec![
                HostHeight::Auto,
                HostHeight::Px(200),
                HostHeight::Auto,
                HostHeight::Px(350),
            ]
        );
    }
}
