// Copyright 2026 the Fitframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted [`FrameHost`] for unit tests.

use alloc::vec::Vec;

use crate::backend::{DocumentId, FrameHost, HostHeight, Readiness};
use crate::error::AccessError;

/// A host whose content state is set directly by the test and which records
/// every height write.
#[derive(Debug)]
pub(crate) struct FakeFrame {
    pub(crate) readiness: Readiness,
    pub(crate) loaded: bool,
    pub(crate) scroll_height: u32,
    pub(crate) fail_writes: bool,
    pub(crate) writes: Vec<HostHeight>,
}

impl FakeFrame {
    pub(crate) fn loaded(doc: DocumentId, scroll_height: u32) -> Self {
        Self {
            readiness: Readiness::Ready(doc),
            loaded: true,
            scroll_height,
            fail_writes: false,
            writes: Vec::new(),
        }
    }

    pub(crate) fn loading() -> Self {
        Self {
            readiness: Readiness::NotReady,
            loaded: false,
            scroll_height: 0,
            fail_writes: false,
            writes: Vec::new(),
        }
    }

    pub(crate) fn cross_origin() -> Self {
        Self {
            readiness: Readiness::BoundaryDenied,
            ..Self::loading()
        }
    }

    /// Simulates a load event completing for `doc`.
    pub(crate) fn finish_load(&mut self, doc: DocumentId, scroll_height: u32) {
        self.readiness = Readiness::Ready(doc);
        self.loaded = true;
        self.scroll_height = scroll_height;
    }

    /// The height style as it currently stands.
    pub(crate) fn height(&self) -> Option<HostHeight> {
        self.writes.last().copied()
    }

    /// Only the explicit pixel writes, in order.
    pub(crate) fn px_writes(&self) -> Vec<u32> {
        self.writes
            .iter()
            .filter_map(|h| match h {
                HostHeight::Px(px) => Some(*px),
                HostHeight::Auto => None,
            })
            .collect()
    }
}

impl FrameHost for FakeFrame {
    fn readiness(&self) -> Readiness {
        self.readiness
    }

    fn is_loaded(&self) -> Result<bool, AccessError> {
        match self.readiness {
            Readiness::BoundaryDenied => Err(AccessError::BoundaryDenied),
            _ => Ok(self.loaded),
        }
    }

    fn content_height(&self) -> Result<u32, AccessError> {
        self.readiness.into_result().map(|_| self.scroll_height)
    }

    fn set_height(&mut self, height: HostHeight) -> Result<(), AccessError> {
        if self.fail_writes {
            return Err(AccessError::Fault("style write rejected".into()));
        }
        self.writes.push(height);
        Ok(())
    }
}
