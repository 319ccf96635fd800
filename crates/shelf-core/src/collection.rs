// Rust guideline compliant 2026-08-02

//! Tab collection and tab creator collaborator seams.
//!
//! The retention engine operates on two collections (active and archived)
//! through the [`TabCollection`] trait and materializes restored tabs
//! through [`TabCreator`]. Hosts plug their own implementations in;
//! [`MemTabList`] is the shipped in-memory implementation.

use crate::models::{TabId, TabRecord};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Where a restored tab is inserted in the active collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Insert at index 0.
    Front,
    /// Append after the last tab.
    End,
}

/// An ordered, mutable collection of tab records.
///
/// Implementations are single-thread confined; the engine never shares a
/// collection across threads.
pub trait TabCollection {
    /// Returns the number of tabs in the collection.
    fn len(&self) -> usize;

    /// Returns true if the collection holds no tabs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tab at `index`, if any.
    fn get(&self, index: usize) -> Option<&TabRecord>;

    /// Returns a mutable reference to the tab at `index`, if any.
    fn get_mut(&mut self, index: usize) -> Option<&mut TabRecord>;

    /// Returns the tab with the given id, if present.
    fn get_by_id(&self, id: TabId) -> Option<&TabRecord>;

    /// Inserts a tab at `index`, shifting later tabs right. An `index` at
    /// or past the end appends.
    fn insert(&mut self, index: usize, tab: TabRecord);

    /// Closes all tabs whose ids appear in `ids` as one transaction.
    ///
    /// When `allow_undo` is true the collection may retain the closed
    /// batch for restoration. The retention engine always closes with
    /// `allow_undo = false`.
    ///
    /// # Returns
    ///
    /// The number of tabs actually removed.
    fn close(&mut self, ids: &[TabId], allow_undo: bool) -> usize;

    /// Returns the id of the currently foregrounded tab, if any.
    fn foreground(&self) -> Option<TabId>;

    /// Returns the ids of all tabs in collection order.
    fn ids(&self) -> Vec<TabId> {
        (0..self.len()).filter_map(|i| self.get(i)).map(|t| t.id).collect()
    }
}

/// Materializes a tab record from its serialized state into the active
/// collection.
pub trait TabCreator {
    /// Recreates `record` (including its browsing state) at `position`.
    fn create_from_state(&self, record: &TabRecord, position: InsertPosition);
}

/// In-memory [`TabCollection`] with an undo buffer for user-facing closes.
#[derive(Debug, Default)]
pub struct MemTabList {
    tabs: Vec<TabRecord>,
    foreground: Option<TabId>,
    undo_stack: Vec<Vec<TabRecord>>,
}

impl MemTabList {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding `tabs` in order.
    pub fn with_tabs(tabs: Vec<TabRecord>) -> Self {
        Self {
            tabs,
            foreground: None,
            undo_stack: Vec::new(),
        }
    }

    /// Marks the given tab as foregrounded. Passing `None` clears it.
    pub fn set_foreground(&mut self, id: Option<TabId>) {
        self.foreground = id;
    }

    /// Restores the most recently undoable-closed batch.
    ///
    /// Restored tabs are appended at the end; original positions are not
    /// preserved.
    ///
    /// # Returns
    ///
    /// The number of tabs restored.
    pub fn restore_last_closed(&mut self) -> usize {
        match self.undo_stack.pop() {
            Some(batch) => {
                let count = batch.len();
                self.tabs.extend(batch);
                count
            }
            None => 0,
        }
    }

    /// Iterates over the records in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &TabRecord> {
        self.tabs.iter()
    }
}

impl TabCollection for MemTabList {
    fn len(&self) -> usize {
        self.tabs.len()
    }

    fn get(&self, index: usize) -> Option<&TabRecord> {
        self.tabs.get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut TabRecord> {
        self.tabs.get_mut(index)
    }

    fn get_by_id(&self, id: TabId) -> Option<&TabRecord> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn insert(&mut self, index: usize, tab: TabRecord) {
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, tab);
    }

    fn close(&mut self, ids: &[TabId], allow_undo: bool) -> usize {
        let targets: HashSet<TabId> = ids.iter().copied().collect();
        let mut removed = Vec::new();
        self.tabs.retain(|t| {
            if targets.contains(&t.id) {
                removed.push(t.clone());
                false
            } else {
                true
            }
        });

        if self.foreground.is_some_and(|fg| targets.contains(&fg)) {
            self.foreground = None;
        }

        let count = removed.len();
        if allow_undo && count > 0 {
            self.undo_stack.push(removed);
        }
        count
    }

    fn foreground(&self) -> Option<TabId> {
        self.foreground
    }
}

/// [`TabCreator`] that inserts records into a shared [`TabCollection`].
pub struct MemTabCreator {
    target: Rc<RefCell<dyn TabCollection>>,
}

impl MemTabCreator {
    /// Creates a creator targeting the given collection.
    pub fn new(target: Rc<RefCell<dyn TabCollection>>) -> Self {
        Self { target }
    }
}

impl TabCreator for MemTabCreator {
    fn create_from_state(&self, record: &TabRecord, position: InsertPosition) {
        let mut target = self.target.borrow_mut();
        let index = match position {
            InsertPosition::Front => 0,
            InsertPosition::End => target.len(),
        };
        target.insert(index, record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TabRecord;

    fn tab(id: i64) -> TabRecord {
        TabRecord::new(TabId(id), format!("https://example.com/{id}"), 1000)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut list = MemTabList::new();
        list.insert(0, tab(1));
        list.insert(1, tab(2));
        list.insert(0, tab(3));

        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0).unwrap().id, TabId(3));
        assert_eq!(list.get_by_id(TabId(2)).unwrap().id, TabId(2));
        assert_eq!(list.ids(), vec![TabId(3), TabId(1), TabId(2)]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut list = MemTabList::new();
        list.insert(99, tab(1));
        list.insert(99, tab(2));
        assert_eq!(list.ids(), vec![TabId(1), TabId(2)]);
    }

    #[test]
    fn test_close_is_transactional() {
        let mut list = MemTabList::with_tabs(vec![tab(1), tab(2), tab(3), tab(4)]);
        let closed = list.close(&[TabId(2), TabId(4), TabId(99)], false);

        assert_eq!(closed, 2);
        assert_eq!(list.ids(), vec![TabId(1), TabId(3)]);
    }

    #[test]
    fn test_undoable_close_restores() {
        let mut list = MemTabList::with_tabs(vec![tab(1), tab(2), tab(3)]);
        list.close(&[TabId(2)], true);
        assert_eq!(list.len(), 2);

        assert_eq!(list.restore_last_closed(), 1);
        assert_eq!(list.len(), 3);
        assert!(list.get_by_id(TabId(2)).is_some());
    }

    #[test]
    fn test_non_undoable_close_cannot_restore() {
        let mut list = MemTabList::with_tabs(vec![tab(1), tab(2)]);
        list.close(&[TabId(1)], false);
        assert_eq!(list.restore_last_closed(), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_closing_foreground_clears_it() {
        let mut list = MemTabList::with_tabs(vec![tab(1), tab(2)]);
        list.set_foreground(Some(TabId(1)));
        list.close(&[TabId(1)], false);
        assert_eq!(list.foreground(), None);
    }

    #[test]
    fn test_creator_positions() {
        let list: Rc<RefCell<dyn TabCollection>> =
            Rc::new(RefCell::new(MemTabList::with_tabs(vec![tab(1)])));
        let creator = MemTabCreator::new(Rc::clone(&list));

        creator.create_from_state(&tab(2), InsertPosition::End);
        creator.create_from_state(&tab(3), InsertPosition::Front);

        assert_eq!(list.borrow().ids(), vec![TabId(3), TabId(1), TabId(2)]);
    }
}
