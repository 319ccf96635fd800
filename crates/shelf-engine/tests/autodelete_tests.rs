// Rust guideline compliant 2026-08-05

//! Integration tests for the auto-delete pass.

use shelf_core::{
    ArchiveMetadata, Clock, MemMetadataStore, MemTabList, MetadataStore, RetentionSettings,
    TabCollection, TabId, TabRecord, INVALID_TIMESTAMP,
};
use shelf_engine::{ArchivalEngine, RetentionObserver};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const HOUR: i64 = 3_600_000;
const NOW: i64 = 20_000 * HOUR;

struct FakeClock {
    now: Cell<i64>,
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

#[derive(Default)]
struct CountingObserver {
    autodelete_passes: Cell<u32>,
}

impl RetentionObserver for CountingObserver {
    fn on_autodelete_pass_completed(&self) {
        self.autodelete_passes.set(self.autodelete_passes.get() + 1);
    }
}

struct Harness {
    archived: Rc<RefCell<MemTabList>>,
    metadata: Rc<MemMetadataStore>,
    settings: Rc<RefCell<RetentionSettings>>,
    engine: ArchivalEngine,
}

/// Builds an engine whose archive holds `tabs`, each optionally paired
/// with a stamped archive moment.
async fn harness(tabs: Vec<(TabRecord, Option<i64>)>) -> Harness {
    let active = Rc::new(RefCell::new(MemTabList::new()));
    let archived = Rc::new(RefCell::new(MemTabList::new()));
    let metadata = Rc::new(MemMetadataStore::new());
    let settings = Rc::new(RefCell::new(RetentionSettings::default()));
    let clock = Rc::new(FakeClock {
        now: Cell::new(NOW),
    });

    for (tab, archived_at) in tabs {
        let id = tab.id;
        let end = archived.borrow().len();
        archived.borrow_mut().insert(end, tab.archived_copy());
        if let Some(at) = archived_at {
            metadata.put(id, ArchiveMetadata::new(at)).await;
        }
    }

    let engine = ArchivalEngine::new(
        active as Rc<RefCell<dyn TabCollection>>,
        Rc::clone(&archived) as Rc<RefCell<dyn TabCollection>>,
        Rc::clone(&metadata) as Rc<dyn MetadataStore>,
        Rc::clone(&settings),
        clock,
    );

    Harness {
        archived,
        metadata,
        settings,
        engine,
    }
}

fn tab(id: i64, url: &str) -> TabRecord {
    TabRecord::new(TabId(id), url, NOW - HOUR)
}

#[tokio::test]
async fn test_expired_tabs_deleted() {
    let h = harness(vec![
        (tab(1, "https://a"), Some(NOW - 2_000 * HOUR)),
        (tab(2, "https://b"), Some(NOW - 10 * HOUR)),
    ])
    .await;

    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 1);
    assert!(summary.completed);
    assert!(h.archived.borrow().get_by_id(TabId(1)).is_none());
    assert!(h.archived.borrow().get_by_id(TabId(2)).is_some());
    assert_eq!(h.engine.counters().snapshot().tabs_deleted, 1);
}

#[tokio::test]
async fn test_deletion_boundary_is_inclusive() {
    let h = harness(vec![
        (tab(1, "https://a"), Some(NOW - 1_440 * HOUR)),
        (tab(2, "https://b"), Some(NOW - 1_439 * HOUR)),
    ])
    .await;

    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 1);
    assert!(h.archived.borrow().get_by_id(TabId(1)).is_none());
    assert!(h.archived.borrow().get_by_id(TabId(2)).is_some());
}

#[tokio::test]
async fn test_deleted_tab_metadata_removed() {
    let h = harness(vec![(tab(1, "https://a"), Some(NOW - 2_000 * HOUR))]).await;

    h.engine.do_autodelete_pass().await;

    assert!(h.metadata.get(TabId(1)).await.is_none());
    assert!(h.metadata.is_empty());
}

#[tokio::test]
async fn test_missing_metadata_not_eligible() {
    let h = harness(vec![(tab(1, "https://a"), None)]).await;

    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 0);
    assert!(h.archived.borrow().get_by_id(TabId(1)).is_some());
}

#[tokio::test]
async fn test_unstamped_metadata_not_eligible() {
    let h = harness(vec![(tab(1, "https://a"), Some(INVALID_TIMESTAMP))]).await;
    // An unstamped entry is not the same as no entry, but reads the same
    // way for eligibility.
    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 0);
    assert!(h.archived.borrow().get_by_id(TabId(1)).is_some());
}

#[tokio::test]
async fn test_disabled_autodelete_is_noop() {
    let h = harness(vec![(tab(1, "https://a"), Some(NOW - 2_000 * HOUR))]).await;
    h.settings.borrow_mut().auto_delete_enabled = false;

    let observer = Rc::new(CountingObserver::default());
    h.engine
        .observers()
        .register(Rc::clone(&observer) as Rc<dyn RetentionObserver>);

    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 0);
    assert!(summary.completed);
    assert_eq!(h.archived.borrow().len(), 1);
    assert_eq!(observer.autodelete_passes.get(), 0);
}

#[tokio::test]
async fn test_observer_notified_on_completion() {
    let h = harness(vec![(tab(1, "https://a"), Some(NOW - 2_000 * HOUR))]).await;
    let observer = Rc::new(CountingObserver::default());
    h.engine
        .observers()
        .register(Rc::clone(&observer) as Rc<dyn RetentionObserver>);

    h.engine.do_autodelete_pass().await;

    assert_eq!(observer.autodelete_passes.get(), 1);
}

#[tokio::test]
async fn test_threshold_override() {
    let h = harness(vec![
        (tab(1, "https://a"), Some(NOW - 200 * HOUR)),
        (tab(2, "https://b"), Some(NOW - 100 * HOUR)),
    ])
    .await;
    h.settings.borrow_mut().auto_delete_age_hours = 150;

    let summary = h.engine.do_autodelete_pass().await;

    assert_eq!(summary.deleted, 1);
    assert!(h.archived.borrow().get_by_id(TabId(2)).is_some());
}
