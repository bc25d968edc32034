//! Per-event-kind emission throttle.
//!
//! Each throttled kind owns a counter and a limit fixed at construction.
//! The first `limit` emissions are delivered; later ones are dropped until
//! the kind is explicitly cleared.  Suppression is not an error, the
//! component keeps running normally.

use log::trace;

/// Event kinds subject to throttling.  Everything else is always delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ThrottledEvent {
    FactorUpdated = 0,
}

impl ThrottledEvent {
    pub const COUNT: usize = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThrottleEntry {
    count: u32,
    limit: u32,
}

/// Fixed table of throttle counters, indexed by [`ThrottledEvent`].
#[derive(Debug, Clone)]
pub struct ThrottleTable {
    entries: [ThrottleEntry; ThrottledEvent::COUNT],
}

impl ThrottleTable {
    pub fn new(factor_updated_limit: u32) -> Self {
        Self {
            entries: [ThrottleEntry {
                count: 0,
                limit: factor_updated_limit,
            }],
        }
    }

    /// Record one emission attempt.  Returns `true` if the event should be
    /// delivered.
    pub fn admit(&mut self, kind: ThrottledEvent) -> bool {
        let entry = &mut self.entries[kind as usize];
        if entry.count >= entry.limit {
            trace!("{:?} suppressed ({}/{})", kind, entry.count, entry.limit);
            return false;
        }
        entry.count += 1;
        true
    }

    /// Reset the counter for `kind`.
    pub fn clear(&mut self, kind: ThrottledEvent) {
        self.entries[kind as usize].count = 0;
    }

    pub fn count(&self, kind: ThrottledEvent) -> u32 {
        self.entries[kind as usize].count
    }

    pub fn limit(&self, kind: ThrottledEvent) -> u32 {
        self.entries[kind as usize].limit
    }

    pub fn is_suppressed(&self, kind: ThrottledEvent) -> bool {
        let entry = &self.entries[kind as usize];
        entry.count >= entry.limit
    }
}
