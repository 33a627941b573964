//! Mutable per-watcher state: the committed snapshot baseline plus the
//! typing guard. Safe without synchronization because a watcher's loop is the
//! only writer and every callback runs to completion before the next.

use crate::guard::TypingGuard;
use crate::snapshot::Snapshot;

pub struct TrackedState {
    snapshot: Snapshot,
    pub typing: TypingGuard,
}

impl TrackedState {
    /// The baseline comes from one extraction at observer start, so the first
    /// diff compares against reality instead of emptiness.
    pub fn new(baseline: Snapshot) -> Self {
        Self {
            snapshot: baseline,
            typing: TypingGuard::default(),
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Commits a new snapshot, returning the one it displaces.
    pub fn swap(&mut self, next: Snapshot) -> Snapshot {
        std::mem::replace(&mut self.snapshot, next)
    }
}
