// Rust guideline compliant 2026-08-05

//! Informational counters for retention passes.
//!
//! Counters are observability only; they never feed back into policy and
//! are never part of an error path. Cell-based because the engine is
//! single-thread confined.

use std::cell::Cell;

/// Monotonically increasing counters across the engine's lifetime.
#[derive(Debug, Default)]
pub struct RetentionCounters {
    tabs_archived: Cell<u64>,
    tabs_deleted: Cell<u64>,
    tabs_restored: Cell<u64>,
    duplicates_reconciled: Cell<u64>,
    cap_truncations: Cell<u64>,
    field_repairs: Cell<u64>,
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    /// Tabs moved from active to archived.
    pub tabs_archived: u64,
    /// Tabs permanently removed from the archive.
    pub tabs_deleted: u64,
    /// Tabs moved back from archived to active.
    pub tabs_restored: u64,
    /// Active copies closed because the tab already existed in the archive.
    pub duplicates_reconciled: u64,
    /// Archive passes whose candidate scan stopped at the per-pass cap.
    pub cap_truncations: u64,
    /// Archived records whose ancestry fields needed repair.
    pub field_repairs: u64,
}

impl RetentionCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all current values.
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            tabs_archived: self.tabs_archived.get(),
            tabs_deleted: self.tabs_deleted.get(),
            tabs_restored: self.tabs_restored.get(),
            duplicates_reconciled: self.duplicates_reconciled.get(),
            cap_truncations: self.cap_truncations.get(),
            field_repairs: self.field_repairs.get(),
        }
    }

    pub(crate) fn add_archived(&self, n: u64) {
        self.tabs_archived.set(self.tabs_archived.get() + n);
    }

    pub(crate) fn add_deleted(&self, n: u64) {
        self.tabs_deleted.set(self.tabs_deleted.get() + n);
    }

    pub(crate) fn add_restored(&self, n: u64) {
        self.tabs_restored.set(self.tabs_restored.get() + n);
    }

    pub(crate) fn add_duplicates_reconciled(&self, n: u64) {
        self.duplicates_reconciled
            .set(self.duplicates_reconciled.get() + n);
    }

    pub(crate) fn add_cap_truncation(&self) {
        self.cap_truncations.set(self.cap_truncations.get() + 1);
    }

    pub(crate) fn add_field_repairs(&self, n: u64) {
        self.field_repairs.set(self.field_repairs.get() + n);
    }
}
