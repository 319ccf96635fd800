// Rust guideline compliant 2026-08-02

//! Retention policy configuration.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy parameters for tab archiving and auto-deletion.
///
/// Pure configuration: no logic beyond persisted-preference storage.
/// Missing keys resolve to the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Whether the archive pass is enabled.
    #[serde(default = "default_archive_enabled")]
    pub archive_enabled: bool,

    /// Hours of inactivity before a tab becomes archive-eligible.
    #[serde(default = "default_archive_age_hours")]
    pub archive_age_hours: u32,

    /// Whether the auto-delete pass is enabled.
    #[serde(default = "default_auto_delete_enabled")]
    pub auto_delete_enabled: bool,

    /// Hours in the archive before a tab becomes delete-eligible.
    #[serde(default = "default_auto_delete_age_hours")]
    pub auto_delete_age_hours: u32,

    /// Maximum number of tabs archived in a single pass.
    #[serde(default = "default_max_simultaneous_archives")]
    pub max_simultaneous_archives: usize,

    /// Whether duplicate tabs are archived regardless of age.
    #[serde(default = "default_archive_duplicate_tabs")]
    pub archive_duplicate_tabs: bool,

    /// Whether whole tab groups are archive-eligible.
    #[serde(default = "default_archive_tab_groups")]
    pub archive_tab_groups: bool,
}

/// Archiving is on by default.
fn default_archive_enabled() -> bool {
    true
}

/// Default inactivity threshold: one week.
fn default_archive_age_hours() -> u32 {
    168
}

/// Auto-delete is on by default.
fn default_auto_delete_enabled() -> bool {
    true
}

/// Default deletion threshold: sixty days in the archive.
fn default_auto_delete_age_hours() -> u32 {
    1440
}

/// Default per-pass archive cap.
fn default_max_simultaneous_archives() -> usize {
    500
}

/// Duplicate archiving is on by default.
fn default_archive_duplicate_tabs() -> bool {
    true
}

/// Group archiving is on by default.
fn default_archive_tab_groups() -> bool {
    true
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            archive_enabled: default_archive_enabled(),
            archive_age_hours: default_archive_age_hours(),
            auto_delete_enabled: default_auto_delete_enabled(),
            auto_delete_age_hours: default_auto_delete_age_hours(),
            max_simultaneous_archives: default_max_simultaneous_archives(),
            archive_duplicate_tabs: default_archive_duplicate_tabs(),
            archive_tab_groups: default_archive_tab_groups(),
        }
    }
}

impl RetentionSettings {
    /// Loads settings from file and environment variables.
    ///
    /// Values are layered in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. `retention.toml` in `settings_dir`
    /// 3. Environment variables with `SHELF_` prefix
    ///
    /// # Arguments
    ///
    /// * `settings_dir` - Directory holding `retention.toml`
    ///
    /// # Returns
    ///
    /// The layered, validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings file exists but cannot be read
    /// - The settings file contains invalid TOML
    /// - Values fail validation
    pub fn load(settings_dir: &Path) -> Result<Self> {
        let mut settings = Self::default();

        let settings_path = settings_dir.join("retention.toml");
        if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            settings = toml::from_str(&content).map_err(|e| {
                crate::Error::InvalidSettings(format!("Invalid settings file: {}", e))
            })?;
        }

        settings.apply_env_overrides()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Applies environment variable overrides.
    ///
    /// Supported variables:
    /// - `SHELF_ARCHIVE_ENABLED` (true/false)
    /// - `SHELF_ARCHIVE_AGE_HOURS`
    /// - `SHELF_AUTO_DELETE_ENABLED` (true/false)
    /// - `SHELF_AUTO_DELETE_AGE_HOURS`
    /// - `SHELF_MAX_SIMULTANEOUS_ARCHIVES`
    /// - `SHELF_ARCHIVE_DUPLICATE_TABS` (true/false)
    /// - `SHELF_ARCHIVE_TAB_GROUPS` (true/false)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SHELF_ARCHIVE_ENABLED") {
            self.archive_enabled = val.parse().map_err(|_| {
                crate::Error::InvalidSettings("SHELF_ARCHIVE_ENABLED must be true or false".into())
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_ARCHIVE_AGE_HOURS") {
            self.archive_age_hours = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_ARCHIVE_AGE_HOURS must be a positive number".into(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_AUTO_DELETE_ENABLED") {
            self.auto_delete_enabled = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_AUTO_DELETE_ENABLED must be true or false".into(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_AUTO_DELETE_AGE_HOURS") {
            self.auto_delete_age_hours = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_AUTO_DELETE_AGE_HOURS must be a positive number".into(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_MAX_SIMULTANEOUS_ARCHIVES") {
            self.max_simultaneous_archives = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_MAX_SIMULTANEOUS_ARCHIVES must be a positive number".into(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_ARCHIVE_DUPLICATE_TABS") {
            self.archive_duplicate_tabs = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_ARCHIVE_DUPLICATE_TABS must be true or false".into(),
                )
            })?;
        }

        if let Ok(val) = std::env::var("SHELF_ARCHIVE_TAB_GROUPS") {
            self.archive_tab_groups = val.parse().map_err(|_| {
                crate::Error::InvalidSettings(
                    "SHELF_ARCHIVE_TAB_GROUPS must be true or false".into(),
                )
            })?;
        }

        Ok(())
    }

    /// Validates the settings values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either age threshold is zero
    /// - The per-pass archive cap is zero
    fn validate(&self) -> Result<()> {
        if self.archive_age_hours == 0 {
            return Err(crate::Error::InvalidSettings(
                "archive_age_hours must be greater than 0".into(),
            ));
        }

        if self.auto_delete_age_hours == 0 {
            return Err(crate::Error::InvalidSettings(
                "auto_delete_age_hours must be greater than 0".into(),
            ));
        }

        if self.max_simultaneous_archives == 0 {
            return Err(crate::Error::InvalidSettings(
                "max_simultaneous_archives must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Saves the settings to `retention.toml`.
    ///
    /// # Arguments
    ///
    /// * `settings_dir` - Directory to write `retention.toml` into
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization
    /// fails.
    pub fn save(&self, settings_dir: &Path) -> Result<()> {
        let settings_path = settings_dir.join("retention.toml");
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::Error::InvalidSettings(format!("Failed to serialize settings: {}", e))
        })?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
