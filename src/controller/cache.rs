//! # State Cache
//!
//! Holds the most recent fully processed snapshot for pull reads.

use crate::report::ControlSnapshot;

/// Latest processed snapshot, or nothing before the first report.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    latest: Option<ControlSnapshot>,
    updates: u64,
}

impl StateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached snapshot.
    pub fn store(&mut self, snapshot: ControlSnapshot) {
        self.latest = Some(snapshot);
        self.updates += 1;
    }

    /// Returns the cached snapshot, `None` if no report was ever processed.
    #[must_use]
    pub fn latest(&self) -> Option<ControlSnapshot> {
        self.latest
    }

    /// Number of snapshots stored so far.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
