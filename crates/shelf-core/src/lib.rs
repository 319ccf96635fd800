// Rust guideline compliant 2026-08-02

//! Shelf Core Library
//!
//! This crate provides the foundational components for the shelf tab
//! retention system:
//! - Data models (TabRecord, ArchiveMetadata, ids)
//! - Retention settings (TOML file + environment overrides)
//! - Collection and creator collaborator traits with in-memory implementations
//! - Archive metadata stores (in-memory and JSONL-backed)
//! - Clock abstraction
//! - Error types and result handling

pub mod clock;
pub mod collection;
pub mod error;
pub mod metadata;
pub mod models;
pub mod settings;

pub use clock::{Clock, SystemClock};
pub use collection::{InsertPosition, MemTabCreator, MemTabList, TabCollection, TabCreator};
pub use error::{Error, Result};
pub use metadata::{JsonlMetadataStore, MemMetadataStore, MetadataStore};
pub use models::{ArchiveMetadata, GroupId, TabId, TabRecord, TabState, INVALID_TIMESTAMP};
pub use settings::RetentionSettings;
