// Rust guideline compliant 2026-08-02

//! Archive metadata storage.
//!
//! Per-tab [`ArchiveMetadata`] lives in a key/value store keyed by tab id.
//! Lookups are asynchronous: real hosts back this with persisted state.
//! The store surface never fails outward; a missing or unreadable entry
//! reads as `None` and write failures are logged and dropped.

use crate::models::{ArchiveMetadata, TabId};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Asynchronous per-tab store of [`ArchiveMetadata`].
#[async_trait(?Send)]
pub trait MetadataStore {
    /// Returns the metadata for `id`, if present and readable.
    async fn get(&self, id: TabId) -> Option<ArchiveMetadata>;

    /// Creates or replaces the metadata for `id`.
    async fn put(&self, id: TabId, meta: ArchiveMetadata);

    /// Removes the metadata for `id`, if present.
    async fn remove(&self, id: TabId);

    /// Removes all entries.
    async fn clear(&self);
}

/// In-memory [`MetadataStore`].
#[derive(Debug, Default)]
pub struct MemMetadataStore {
    entries: RefCell<HashMap<TabId, ArchiveMetadata>>,
}

impl MemMetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl MetadataStore for MemMetadataStore {
    async fn get(&self, id: TabId) -> Option<ArchiveMetadata> {
        self.entries.borrow().get(&id).copied()
    }

    async fn put(&self, id: TabId, meta: ArchiveMetadata) {
        self.entries.borrow_mut().insert(id, meta);
    }

    async fn remove(&self, id: TabId) {
        self.entries.borrow_mut().remove(&id);
    }

    async fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// One line of the JSONL metadata file.
#[derive(Debug, Serialize, Deserialize)]
struct MetadataLine {
    tab_id: TabId,
    #[serde(flatten)]
    meta: ArchiveMetadata,
}

/// File-backed [`MetadataStore`] persisting entries to a JSONL file.
///
/// The full entry map is kept in memory; every mutation rewrites the file
/// through a temp file and atomic rename, serialized by an advisory file
/// lock.
pub struct JsonlMetadataStore {
    path: PathBuf,
    entries: RefCell<HashMap<TabId, ArchiveMetadata>>,
}

impl JsonlMetadataStore {
    /// Opens the store at `path`, loading any existing entries.
    ///
    /// Malformed lines are skipped with a warning rather than failing the
    /// open; a missing file is an empty store.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSONL file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = Self::load_entries(&path)?;
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn load_entries(path: &Path) -> Result<HashMap<TabId, ArchiveMetadata>> {
        use std::fs::File;
        use std::io::BufReader;

        let mut entries = HashMap::new();
        if !path.exists() {
            return Ok(entries);
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let stream = serde_json::Deserializer::from_reader(reader).into_iter::<MetadataLine>();

        for result in stream {
            match result {
                Ok(line) => {
                    entries.insert(line.tab_id, line.meta);
                }
                Err(e) => {
                    warn!(error = %e, "skipping malformed metadata line");
                }
            }
        }

        Ok(entries)
    }

    /// Rewrites the file from the in-memory map via temp file + rename.
    fn persist(&self) -> Result<()> {
        use std::fs::File;
        use std::io::Write;

        self.with_lock(|| {
            let temp_path = self.path.with_extension("jsonl.tmp");

            {
                let mut file = File::create(&temp_path)?;
                let entries = self.entries.borrow();
                let mut ids: Vec<TabId> = entries.keys().copied().collect();
                ids.sort();

                for id in ids {
                    let line = MetadataLine {
                        tab_id: id,
                        meta: entries[&id],
                    };
                    let json = serde_json::to_string(&line)?;
                    file.write_all(json.as_bytes())?;
                    file.write_all(b"\n")?;
                }

                file.sync_all()?;
            }

            std::fs::rename(&temp_path, &self.path)?;
            Ok(())
        })
    }

    /// Executes a closure with an exclusive advisory lock on the store.
    fn with_lock<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        use fs2::FileExt;
        use std::fs::OpenOptions;

        let lock_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;

        lock_file.try_lock_exclusive().map_err(|e| {
            crate::Error::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                format!("Failed to acquire lock: {}", e),
            ))
        })?;

        let result = f();

        let _ = lock_file.unlock();

        result
    }
}

#[async_trait(?Send)]
impl MetadataStore for JsonlMetadataStore {
    async fn get(&self, id: TabId) -> Option<ArchiveMetadata> {
        self.entries.borrow().get(&id).copied()
    }

    async fn put(&self, id: TabId, meta: ArchiveMetadata) {
        self.entries.borrow_mut().insert(id, meta);
        if let Err(e) = self.persist() {
            warn!(tab = %id, error = %e, "failed to persist metadata entry");
        }
    }

    async fn remove(&self, id: TabId) {
        if self.entries.borrow_mut().remove(&id).is_some() {
            if let Err(e) = self.persist() {
                warn!(tab = %id, error = %e, "failed to persist metadata removal");
            }
        }
    }

    async fn clear(&self) {
        self.entries.borrow_mut().clear();
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist metadata clear");
        }
    }
}
