// Rust guideline compliant 2026-08-05

//! Shelf Retention Engine
//!
//! The policy engine behind tab archiving:
//! - Eligibility rules (age thresholds, duplicate detection, group
//!   all-or-nothing)
//! - Archive and auto-delete passes over injected collections
//! - Restoration and bulk rescue back into the active collection
//! - A strictly sequential, cancellable async walker for per-tab
//!   bookkeeping
//! - Observer notifications and informational counters
//!
//! All engine state is single-thread confined; drive it from one thread
//! on a current-thread async runtime.

pub mod archive;
pub mod counters;
pub mod eligibility;
pub mod observer;
pub mod restore;
pub mod runner;

pub use archive::{ArchivalEngine, ArchivePassSummary, AutodeletePassSummary};
pub use counters::{CountersSnapshot, RetentionCounters};
pub use eligibility::{
    age_hours, build_mru_map, find_cross_collection_duplicates, is_archived_tab_delete_eligible,
    is_tab_archive_eligible, GroupEligibilityCache, MS_PER_HOUR,
};
pub use observer::{ObserverHandle, ObserverRegistry, RetentionEvent, RetentionObserver};
pub use restore::RestorationEngine;
pub use runner::{run_sequential, RunStats};
