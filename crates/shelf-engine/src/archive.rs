// Rust guideline compliant 2026-08-05

//! The archival engine: archive and auto-delete passes.
//!
//! A pass moves through `ComputingCandidates → MutatingCollections →
//! AsyncBookkeeping → Complete`. Collection mutation is synchronous and
//! finishes before any bookkeeping starts; the archived-side insert
//! happens before the active-side close so an aborted pass can leave a
//! tab in both collections but never in neither. Passes never raise:
//! every edge case degrades to "skip" or "not eligible".

use crate::counters::RetentionCounters;
use crate::eligibility::{
    build_mru_map, find_cross_collection_duplicates, is_archived_tab_delete_eligible,
    is_tab_archive_eligible, GroupEligibilityCache,
};
use crate::observer::ObserverRegistry;
use crate::runner::run_sequential;
use shelf_core::{
    ArchiveMetadata, Clock, GroupId, MetadataStore, RetentionSettings, TabCollection, TabId,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::thread::{self, ThreadId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one archive pass. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePassSummary {
    /// Tabs moved to the archived collection this pass.
    pub archived: usize,
    /// Active copies closed by duplicate reconciliation.
    pub duplicates_closed: usize,
    /// Whether the candidate scan stopped early at the per-pass cap.
    pub cap_hit: bool,
    /// False when bookkeeping was cancelled mid-walk.
    pub completed: bool,
}

/// Outcome of one auto-delete pass. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutodeletePassSummary {
    /// Tabs permanently removed from the archive this pass.
    pub deleted: usize,
    /// False when the walk was cancelled mid-pass.
    pub completed: bool,
}

/// Background engine that moves tabs between the active and archived
/// collections according to [`RetentionSettings`].
///
/// Single-thread confined: the engine holds `Rc`/`RefCell` state and must
/// be driven from the thread that created it (each entry point
/// debug-asserts this). Overlapping passes are not guarded against here;
/// the owning scheduler serializes them.
pub struct ArchivalEngine {
    active: Rc<RefCell<dyn TabCollection>>,
    archived: Rc<RefCell<dyn TabCollection>>,
    metadata: Rc<dyn MetadataStore>,
    settings: Rc<RefCell<RetentionSettings>>,
    clock: Rc<dyn Clock>,
    observers: Rc<ObserverRegistry>,
    counters: Rc<RetentionCounters>,
    cancel: CancellationToken,
    owner: ThreadId,
}

impl ArchivalEngine {
    /// Creates an engine over the given collaborators.
    ///
    /// # Arguments
    ///
    /// * `active` - The user-visible tab collection
    /// * `archived` - The archive collection
    /// * `metadata` - Per-tab archive metadata store
    /// * `settings` - Shared policy parameters
    /// * `clock` - Time source for all eligibility decisions
    pub fn new(
        active: Rc<RefCell<dyn TabCollection>>,
        archived: Rc<RefCell<dyn TabCollection>>,
        metadata: Rc<dyn MetadataStore>,
        settings: Rc<RefCell<RetentionSettings>>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            active,
            archived,
            metadata,
            settings,
            clock,
            observers: Rc::new(ObserverRegistry::new()),
            counters: Rc::new(RetentionCounters::new()),
            cancel: CancellationToken::new(),
            owner: thread::current().id(),
        }
    }

    /// Returns the observer registry for pass notifications.
    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Returns a shared handle to the engine's counters.
    pub fn counters(&self) -> Rc<RetentionCounters> {
        Rc::clone(&self.counters)
    }

    /// Returns a clone of the engine's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels any in-flight sequential walk between steps. Collection
    /// mutations already applied stay in effect.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn assert_owner(&self) {
        debug_assert_eq!(
            self.owner,
            thread::current().id(),
            "engine entry point called off its owning thread"
        );
    }

    /// Runs one archive pass over the active collection.
    ///
    /// Candidates are computed from a snapshot, moved into the archived
    /// collection synchronously (insert before close), then stamped with
    /// archive metadata one tab at a time. Observers are notified and the
    /// consistency sweep runs only when the bookkeeping walk completes.
    pub async fn do_archive_pass(&self) -> ArchivePassSummary {
        self.assert_owner();

        let settings = self.settings.borrow().clone();
        if !settings.archive_enabled {
            debug!("archive pass skipped: archiving disabled");
            return ArchivePassSummary {
                archived: 0,
                duplicates_closed: 0,
                cap_hit: false,
                completed: true,
            };
        }

        let now_ms = self.clock.now_ms();

        let (to_archive, cap_hit) = {
            let active = self.active.borrow();
            collect_candidates(&*active, now_ms, &settings)
        };

        let to_close_duplicates = {
            let active = self.active.borrow();
            let archived = self.archived.borrow();
            find_cross_collection_duplicates(&*active, &*archived)
        };

        // Mutation: archived-side copies first, then one bulk close of the
        // originals and one of the stale duplicates.
        let archived_ids = {
            let active = self.active.borrow();
            let mut archived = self.archived.borrow_mut();
            let mut archived_ids = Vec::with_capacity(to_archive.len());
            for &id in &to_archive {
                // A candidate already present in the archive is a stale
                // duplicate; reconciliation below closes its active copy.
                if archived.get_by_id(id).is_some() {
                    continue;
                }
                if let Some(tab) = active.get_by_id(id) {
                    let end = archived.len();
                    archived.insert(end, tab.archived_copy());
                    archived_ids.push(id);
                }
            }
            archived_ids
        };

        let duplicates_closed = {
            let mut active = self.active.borrow_mut();
            active.close(&archived_ids, false);
            if to_close_duplicates.is_empty() {
                0
            } else {
                active.close(&to_close_duplicates, false)
            }
        };

        self.counters.add_archived(archived_ids.len() as u64);
        self.counters
            .add_duplicates_reconciled(duplicates_closed as u64);
        if cap_hit {
            self.counters.add_cap_truncation();
            debug!(
                cap = settings.max_simultaneous_archives,
                "candidate scan stopped at per-pass cap"
            );
        }

        let stats = run_sequential(archived_ids.clone(), &self.cancel, |id| {
            let metadata = Rc::clone(&self.metadata);
            let clock = Rc::clone(&self.clock);
            let observers = Rc::clone(&self.observers);
            async move {
                match metadata.get(id).await {
                    Some(meta) if meta.is_stamped() => {}
                    Some(mut meta) => {
                        meta.archived_at_ms = clock.now_ms();
                        metadata.put(id, meta).await;
                    }
                    None => {
                        metadata.put(id, ArchiveMetadata::new(clock.now_ms())).await;
                        observers.notify_metadata_created(id);
                    }
                }
            }
        })
        .await;

        let completed = stats.is_some();
        if let Some(stats) = stats {
            debug!(
                processed = stats.processed,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "archive bookkeeping complete"
            );
            self.observers.notify_archive_pass_completed();
            self.ensure_archived_tab_fields();
        }

        info!(
            archived = archived_ids.len(),
            duplicates_closed, cap_hit, completed, "archive pass finished"
        );

        ArchivePassSummary {
            archived: archived_ids.len(),
            duplicates_closed,
            cap_hit,
            completed,
        }
    }

    /// Runs one auto-delete pass over the archived collection.
    ///
    /// The snapshot is walked sequentially; metadata lookups and
    /// deletions interleave per tab rather than batching, so a cancelled
    /// walk leaves every already-visited tab fully handled.
    pub async fn do_autodelete_pass(&self) -> AutodeletePassSummary {
        self.assert_owner();

        let settings = self.settings.borrow().clone();
        if !settings.auto_delete_enabled {
            debug!("auto-delete pass skipped: auto-delete disabled");
            return AutodeletePassSummary {
                deleted: 0,
                completed: true,
            };
        }

        let now_ms = self.clock.now_ms();
        let snapshot = self.archived.borrow().ids();
        let deleted = Rc::new(Cell::new(0usize));

        let stats = run_sequential(snapshot, &self.cancel, |id| {
            let metadata = Rc::clone(&self.metadata);
            let archived = Rc::clone(&self.archived);
            let counters = Rc::clone(&self.counters);
            let deleted = Rc::clone(&deleted);
            let threshold = settings.auto_delete_age_hours;
            async move {
                let meta = metadata.get(id).await;
                if is_archived_tab_delete_eligible(meta.as_ref(), now_ms, threshold) {
                    let closed = archived.borrow_mut().close(&[id], false);
                    if closed > 0 {
                        metadata.remove(id).await;
                        counters.add_deleted(1);
                        deleted.set(deleted.get() + 1);
                    }
                }
            }
        })
        .await;

        let completed = stats.is_some();
        if completed {
            self.observers.notify_autodelete_pass_completed();
        }

        info!(
            deleted = deleted.get(),
            completed, "auto-delete pass finished"
        );

        AutodeletePassSummary {
            deleted: deleted.get(),
            completed,
        }
    }

    /// Forces every archived record's parent link to none and root link
    /// to itself, repairing stale ancestry left by earlier engine
    /// versions or interrupted passes.
    pub fn ensure_archived_tab_fields(&self) {
        self.assert_owner();

        let mut archived = self.archived.borrow_mut();
        let mut repaired = 0u64;
        for i in 0..archived.len() {
            if let Some(tab) = archived.get_mut(i) {
                if tab.parent.is_some() || tab.root != tab.id {
                    tab.parent = None;
                    tab.root = tab.id;
                    repaired += 1;
                }
            }
        }

        if repaired > 0 {
            warn!(repaired, "repaired ancestry fields on archived tabs");
            self.counters.add_field_repairs(repaired);
        }
    }
}

/// Walks the active collection in index order and returns the ids to
/// archive this pass, plus whether the scan stopped early at the cap.
///
/// The foreground tab is skipped before any eligibility test. Grouped
/// tabs are taken all-or-nothing: the first member encountered pulls in
/// the whole group, and a group that does not fit under the remaining cap
/// defers the scan to the next pass.
fn collect_candidates(
    active: &dyn TabCollection,
    now_ms: i64,
    settings: &RetentionSettings,
) -> (Vec<TabId>, bool) {
    let mru = build_mru_map(active, settings.archive_duplicate_tabs);
    let foreground = active.foreground();
    let cap = settings.max_simultaneous_archives;
    let mut group_cache = GroupEligibilityCache::new();
    let mut taken_groups: HashSet<GroupId> = HashSet::new();
    let mut to_archive: Vec<TabId> = Vec::new();
    let mut cap_hit = false;

    for i in 0..active.len() {
        let Some(tab) = active.get(i) else {
            continue;
        };
        if Some(tab.id) == foreground {
            continue;
        }

        match tab.group {
            None => {
                if is_tab_archive_eligible(tab, now_ms, settings.archive_age_hours, &mru) {
                    if to_archive.len() >= cap {
                        cap_hit = true;
                        break;
                    }
                    to_archive.push(tab.id);
                }
            }
            Some(group) => {
                if taken_groups.contains(&group) {
                    continue;
                }
                if group_cache.is_group_eligible(
                    group,
                    active,
                    now_ms,
                    settings.archive_age_hours,
                    settings.archive_tab_groups,
                    &mru,
                ) {
                    let members = GroupEligibilityCache::group_members(active, group);
                    if to_archive.len() + members.len() > cap {
                        cap_hit = true;
                        break;
                    }
                    taken_groups.insert(group);
                    to_archive.extend(members);
                }
            }
        }
    }

    (to_archive, cap_hit)
}
