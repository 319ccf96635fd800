// Rust guideline compliant 2026-08-05

//! Archive and delete eligibility rules.
//!
//! Pure functions over tab records and a snapshot "now"; the archival
//! engine composes them into passes. A tab with an unknown last-active
//! timestamp is never eligible for anything.

use shelf_core::{ArchiveMetadata, GroupId, TabCollection, TabId, TabRecord};
use std::collections::{HashMap, HashSet};

/// Milliseconds per hour, for age bucketing.
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Returns the whole number of hours elapsed between `then_ms` and
/// `now_ms`. Negative when `then_ms` lies in the future.
pub fn age_hours(now_ms: i64, then_ms: i64) -> i64 {
    (now_ms - then_ms) / MS_PER_HOUR
}

/// Builds the URL → most-recent-last-active map over ungrouped tabs.
///
/// Returns an empty map when duplicate archiving is disabled, which
/// disables the duplicate rule in [`is_tab_archive_eligible`] without a
/// separate flag.
///
/// # Arguments
///
/// * `collection` - The active collection to scan
/// * `duplicates_enabled` - Whether duplicate archiving is on
pub fn build_mru_map(
    collection: &dyn TabCollection,
    duplicates_enabled: bool,
) -> HashMap<String, i64> {
    let mut mru = HashMap::new();
    if !duplicates_enabled {
        return mru;
    }

    for i in 0..collection.len() {
        let Some(tab) = collection.get(i) else {
            continue;
        };
        if tab.is_grouped() {
            continue;
        }
        mru.entry(tab.url.clone())
            .and_modify(|ts: &mut i64| *ts = (*ts).max(tab.last_active_ms))
            .or_insert(tab.last_active_ms);
    }

    mru
}

/// Decides whether a single tab qualifies for archiving.
///
/// A tab qualifies when its age meets the threshold, or when it is an
/// ungrouped duplicate: its URL appears in `mru` with a strictly greater
/// last-active timestamp than the tab's own.
///
/// # Arguments
///
/// * `tab` - The tab under test
/// * `now_ms` - Snapshot of the current time
/// * `age_threshold_hours` - Inactivity threshold
/// * `mru` - URL → max last-active map from [`build_mru_map`]
pub fn is_tab_archive_eligible(
    tab: &TabRecord,
    now_ms: i64,
    age_threshold_hours: u32,
    mru: &HashMap<String, i64>,
) -> bool {
    if !tab.has_valid_timestamp() {
        return false;
    }

    if age_hours(now_ms, tab.last_active_ms) >= i64::from(age_threshold_hours) {
        return true;
    }

    if !tab.is_grouped() {
        if let Some(&newest) = mru.get(&tab.url) {
            return newest > tab.last_active_ms;
        }
    }

    false
}

/// Decides whether an archived tab qualifies for permanent deletion.
///
/// Absent or unstamped metadata reads as "not eligible", never as an
/// error.
pub fn is_archived_tab_delete_eligible(
    meta: Option<&ArchiveMetadata>,
    now_ms: i64,
    age_threshold_hours: u32,
) -> bool {
    match meta {
        Some(meta) if meta.is_stamped() => {
            age_hours(now_ms, meta.archived_at_ms) >= i64::from(age_threshold_hours)
        }
        _ => false,
    }
}

/// Per-pass memoization of group archive eligibility.
///
/// A group's verdict is computed once per pass and reused for every
/// member tab the scan encounters.
#[derive(Debug, Default)]
pub struct GroupEligibilityCache {
    cache: HashMap<GroupId, bool>,
}

impl GroupEligibilityCache {
    /// Creates an empty cache; one per pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of groups evaluated so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if no group has been evaluated yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Decides whether every member of `group` qualifies for archiving.
    ///
    /// False when group archiving is disabled, when any member fails the
    /// individual test, or when the group contains the foregrounded tab
    /// (archiving the rest would split the group).
    pub fn is_group_eligible(
        &mut self,
        group: GroupId,
        collection: &dyn TabCollection,
        now_ms: i64,
        age_threshold_hours: u32,
        groups_enabled: bool,
        mru: &HashMap<String, i64>,
    ) -> bool {
        if !groups_enabled {
            return false;
        }
        if let Some(&verdict) = self.cache.get(&group) {
            return verdict;
        }

        let foreground = collection.foreground();
        let mut members = 0usize;
        let mut eligible = true;
        for i in 0..collection.len() {
            let Some(tab) = collection.get(i) else {
                continue;
            };
            if tab.group != Some(group) {
                continue;
            }
            members += 1;
            if Some(tab.id) == foreground
                || !is_tab_archive_eligible(tab, now_ms, age_threshold_hours, mru)
            {
                eligible = false;
                break;
            }
        }

        let verdict = eligible && members > 0;
        self.cache.insert(group, verdict);
        verdict
    }

    /// Returns the member ids of `group` in collection order.
    pub fn group_members(collection: &dyn TabCollection, group: GroupId) -> Vec<TabId> {
        (0..collection.len())
            .filter_map(|i| collection.get(i))
            .filter(|t| t.group == Some(group))
            .map(|t| t.id)
            .collect()
    }
}

/// Returns the ids present in both collections.
///
/// Such duplicates arise only from an interrupted earlier pass and are
/// repaired by closing the active copy.
pub fn find_cross_collection_duplicates(
    active: &dyn TabCollection,
    archived: &dyn TabCollection,
) -> Vec<TabId> {
    let archived_ids: HashSet<TabId> = archived.ids().into_iter().collect();
    active
        .ids()
        .into_iter()
        .filter(|id| archived_ids.contains(id))
        .collect()
}
