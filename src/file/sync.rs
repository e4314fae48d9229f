//! Sync bookkeeping shared by the bulk writer and the append handle

use crate::config::SyncStrategy;

/// Tracks records written since the last fsync
#[derive(Debug)]
pub(crate) struct SyncTracker {
    strategy: SyncStrategy,
    uncommitted: usize,
}

impl SyncTracker {
    pub(crate) fn new(strategy: SyncStrategy) -> Self {
        Self {
            strategy,
            uncommitted: 0,
        }
    }

    /// Count one written record; returns true when an fsync is due
    pub(crate) fn record_written(&mut self) -> bool {
        self.uncommitted += 1;
        match self.strategy {
            SyncStrategy::EveryNRecords { count } => self.uncommitted >= count,
            SyncStrategy::Never | SyncStrategy::OnClose => false,
        }
    }

    pub(crate) fn synced(&mut self) {
        self.uncommitted = 0;
    }

    /// Whether finishing/closing must fsync
    pub(crate) fn sync_on_close(&self) -> bool {
        self.strategy != SyncStrategy::Never
    }

    pub(crate) fn uncommitted(&self) -> usize {
        self.uncommitted
    }
}
