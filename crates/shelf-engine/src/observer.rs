// Rust guideline compliant 2026-08-05

//! Observer registry for pass completion notifications.
//!
//! Notifications are fire-and-forget and delivered synchronously on the
//! engine's execution context. One-shot registrations auto-deregister
//! after their first delivery; they are modeled as explicit registry
//! entries rather than observers that remove themselves from inside a
//! callback.

use shelf_core::TabId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Receives retention pass notifications.
///
/// All methods default to no-ops so observers implement only what they
/// care about.
pub trait RetentionObserver {
    /// A full archive pass, including bookkeeping, has completed.
    fn on_archive_pass_completed(&self) {}

    /// Archive metadata was created for a freshly archived tab.
    fn on_metadata_created(&self, _tab: TabId) {}

    /// A full auto-delete pass has completed.
    fn on_autodelete_pass_completed(&self) {}
}

/// Notification kinds, used to scope one-shot registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionEvent {
    /// [`RetentionObserver::on_archive_pass_completed`].
    ArchivePassCompleted,
    /// [`RetentionObserver::on_metadata_created`].
    MetadataCreated,
    /// [`RetentionObserver::on_autodelete_pass_completed`].
    AutodeletePassCompleted,
}

/// Handle returned by registration; pass to
/// [`ObserverRegistry::deregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverHandle(u64);

struct Entry {
    handle: u64,
    observer: Rc<dyn RetentionObserver>,
    one_shot: Option<RetentionEvent>,
}

/// Registry of [`RetentionObserver`]s.
#[derive(Default)]
pub struct ObserverRegistry {
    entries: RefCell<Vec<Entry>>,
    next_handle: Cell<u64>,
}

impl ObserverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer for all events.
    pub fn register(&self, observer: Rc<dyn RetentionObserver>) -> ObserverHandle {
        self.insert(observer, None)
    }

    /// Registers an observer that is deregistered automatically after the
    /// first delivery of `event`. Other events are not delivered to it.
    pub fn register_one_shot(
        &self,
        event: RetentionEvent,
        observer: Rc<dyn RetentionObserver>,
    ) -> ObserverHandle {
        self.insert(observer, Some(event))
    }

    /// Removes a registration.
    ///
    /// # Returns
    ///
    /// True if the handle was registered.
    pub fn deregister(&self, handle: ObserverHandle) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.handle != handle.0);
        entries.len() != before
    }

    /// Returns the number of live registrations.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn insert(
        &self,
        observer: Rc<dyn RetentionObserver>,
        one_shot: Option<RetentionEvent>,
    ) -> ObserverHandle {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        self.entries.borrow_mut().push(Entry {
            handle,
            observer,
            one_shot,
        });
        ObserverHandle(handle)
    }

    pub(crate) fn notify_archive_pass_completed(&self) {
        self.deliver(RetentionEvent::ArchivePassCompleted, |o| {
            o.on_archive_pass_completed();
        });
    }

    pub(crate) fn notify_metadata_created(&self, tab: TabId) {
        self.deliver(RetentionEvent::MetadataCreated, |o| {
            o.on_metadata_created(tab);
        });
    }

    pub(crate) fn notify_autodelete_pass_completed(&self) {
        self.deliver(RetentionEvent::AutodeletePassCompleted, |o| {
            o.on_autodelete_pass_completed();
        });
    }

    /// Delivers `event` to every matching entry, then drops fired
    /// one-shots. The entry list is not borrowed while callbacks run, so
    /// observers may register or deregister from inside a callback.
    fn deliver(&self, event: RetentionEvent, f: impl Fn(&dyn RetentionObserver)) {
        let targets: Vec<(u64, Rc<dyn RetentionObserver>, bool)> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.one_shot.is_none() || e.one_shot == Some(event))
            .map(|e| (e.handle, Rc::clone(&e.observer), e.one_shot.is_some()))
            .collect();

        let mut fired_one_shots = Vec::new();
        for (handle, observer, one_shot) in targets {
            f(observer.as_ref());
            if one_shot {
                fired_one_shots.push(handle);
            }
        }

        if !fired_one_shots.is_empty() {
            self.entries
                .borrow_mut()
                .retain(|e| !fired_one_shots.contains(&e.handle));
        }
    }
}
