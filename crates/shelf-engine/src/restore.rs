// Rust guideline compliant 2026-08-05

//! Restoration: moving tabs back from archived to active.

use crate::counters::RetentionCounters;
use shelf_core::{Clock, InsertPosition, MetadataStore, TabCollection, TabCreator, TabId};
use std::cell::RefCell;
use std::rc::Rc;
use std::thread::{self, ThreadId};
use tracing::{debug, info};

/// Moves tabs from the archived collection back into active.
///
/// Single-thread confined like [`crate::ArchivalEngine`]; share its
/// counters handle to keep one set of totals across both engines.
pub struct RestorationEngine {
    archived: Rc<RefCell<dyn TabCollection>>,
    metadata: Rc<dyn MetadataStore>,
    clock: Rc<dyn Clock>,
    counters: Rc<RetentionCounters>,
    owner: ThreadId,
}

impl RestorationEngine {
    /// Creates a restoration engine over the given collaborators.
    ///
    /// # Arguments
    ///
    /// * `archived` - The archive collection tabs are restored out of
    /// * `metadata` - Per-tab archive metadata store
    /// * `clock` - Time source for timestamp refreshes
    /// * `counters` - Shared counters (typically from the archival engine)
    pub fn new(
        archived: Rc<RefCell<dyn TabCollection>>,
        metadata: Rc<dyn MetadataStore>,
        clock: Rc<dyn Clock>,
        counters: Rc<RetentionCounters>,
    ) -> Self {
        Self {
            archived,
            metadata,
            clock,
            counters,
            owner: thread::current().id(),
        }
    }

    fn assert_owner(&self) {
        debug_assert_eq!(
            self.owner,
            thread::current().id(),
            "engine entry point called off its owning thread"
        );
    }

    /// Restores the given tabs into the active collection, in input
    /// order.
    ///
    /// With `update_timestamp`, each tab's last-active moment is refreshed
    /// to now so the next archive pass does not immediately re-archive
    /// it. Tabs being opened by the user land at the end of the active
    /// collection; batch restores land at the front, most recently
    /// restored first. Each restored tab's archive metadata is dropped,
    /// and the originals leave the archive in one bulk close.
    ///
    /// # Arguments
    ///
    /// * `creator` - Materializes records into the active collection
    /// * `tabs` - Ids to restore; ids absent from the archive are skipped
    /// * `update_timestamp` - Whether to refresh last-active to now
    /// * `are_being_opened` - True when the user is opening these tabs
    ///
    /// # Returns
    ///
    /// The number of tabs restored.
    pub async fn unarchive_and_restore_tabs(
        &self,
        creator: &dyn TabCreator,
        tabs: &[TabId],
        update_timestamp: bool,
        are_being_opened: bool,
    ) -> usize {
        self.assert_owner();

        let mut restored: Vec<TabId> = Vec::new();
        for &id in tabs {
            let record = self.archived.borrow().get_by_id(id).cloned();
            let Some(mut record) = record else {
                debug!(tab = %id, "skipping restore: not in archive");
                continue;
            };

            if update_timestamp {
                record.last_active_ms = self.clock.now_ms();
            }

            let position = if are_being_opened {
                InsertPosition::End
            } else {
                InsertPosition::Front
            };
            creator.create_from_state(&record, position);
            self.metadata.remove(id).await;
            restored.push(id);
        }

        if !restored.is_empty() {
            self.archived.borrow_mut().close(&restored, false);
        }
        self.counters.add_restored(restored.len() as u64);

        info!(restored = restored.len(), "unarchive complete");
        restored.len()
    }

    /// Drains the entire archived collection back into active.
    ///
    /// Used when archiving is turned off while the archive still holds
    /// tabs: loops until the archive is empty, so every tab is guaranteed
    /// to end up in the active collection. Timestamps are not refreshed.
    ///
    /// # Returns
    ///
    /// The total number of tabs rescued.
    pub async fn rescue_archived_tabs(&self, creator: &dyn TabCreator) -> usize {
        self.assert_owner();

        let mut total = 0usize;
        loop {
            let snapshot = self.archived.borrow().ids();
            if snapshot.is_empty() {
                break;
            }
            total += self
                .unarchive_and_restore_tabs(creator, &snapshot, false, false)
                .await;
        }

        if total > 0 {
            info!(total, "rescued all archived tabs");
        }
        total
    }
}
