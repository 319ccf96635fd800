// Rust guideline compliant 2026-08-02

//! Error types for the shelf core library.

use thiserror::Error;

/// Result type alias for shelf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for shelf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid retention settings.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Tab not found in a collection.
    #[error("Tab not found: {0}")]
    NotFound(String),
}
