// Rust guideline compliant 2026-08-02

//! Core data models for shelf.

use serde::{Deserialize, Serialize};

/// Sentinel meaning a tab's last-active moment is unknown.
pub const INVALID_TIMESTAMP: i64 = -1;

/// Unique identifier of a tab, stable across archive and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Identifier of a tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// Opaque serialized browsing state of a tab.
///
/// The encoding is owned by external collaborators; the engine only copies
/// it across collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabState(pub Vec<u8>);

impl TabState {
    /// Returns the serialized length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no state has been captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A reference to a tab held by a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabRecord {
    /// Unique tab identifier.
    pub id: TabId,
    /// Last committed URL.
    pub url: String,
    /// Unix timestamp in milliseconds of the last user interaction, or
    /// [`INVALID_TIMESTAMP`] when unknown.
    pub last_active_ms: i64,
    /// Group membership; `None` means the tab is not in a group.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Whether the tab is pinned.
    #[serde(default)]
    pub pinned: bool,
    /// Parent tab used to restore navigation ancestry.
    #[serde(default)]
    pub parent: Option<TabId>,
    /// Root of the tab's opener chain.
    pub root: TabId,
    /// Serialized browsing state.
    #[serde(default)]
    pub state: TabState,
}

impl TabRecord {
    /// Creates a new ungrouped, unpinned tab record rooted at itself.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique tab identifier
    /// * `url` - Last committed URL
    /// * `last_active_ms` - Last interaction timestamp in milliseconds
    pub fn new(id: TabId, url: impl Into<String>, last_active_ms: i64) -> Self {
        Self {
            id,
            url: url.into(),
            last_active_ms,
            group: None,
            pinned: false,
            parent: None,
            root: id,
            state: TabState::default(),
        }
    }

    /// Returns true if the tab belongs to a group.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    /// Returns true if the last-active timestamp is known.
    #[must_use]
    pub fn has_valid_timestamp(&self) -> bool {
        self.last_active_ms != INVALID_TIMESTAMP
    }

    /// Returns the copy of this record suitable for the archived
    /// collection: parent link cleared and root pointing at the tab
    /// itself, state carried over.
    #[must_use]
    pub fn archived_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.parent = None;
        copy.root = copy.id;
        copy
    }
}

/// Per-archived-tab bookkeeping record.
///
/// Exists exactly as long as the corresponding tab lives in the archived
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    /// Unix timestamp in milliseconds of the moment the tab was archived,
    /// or [`INVALID_TIMESTAMP`] when not yet stamped.
    pub archived_at_ms: i64,
    /// Whether the record has been fully persisted by the host.
    pub persist_ready: bool,
}

impl ArchiveMetadata {
    /// Creates metadata stamped at the given moment.
    pub fn new(archived_at_ms: i64) -> Self {
        Self {
            archived_at_ms,
            persist_ready: true,
        }
    }

    /// Returns true if the archive moment has been stamped.
    #[must_use]
    pub fn is_stamped(&self) -> bool {
        self.archived_at_ms != INVALID_TIMESTAMP
    }
}
