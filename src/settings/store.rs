//! Settings persistence
//!
//! Loads and saves the flat settings record as JSON. Saves are atomic
//! (write to a temp file in the same directory, then rename) so a power cut
//! mid-write cannot corrupt the record. Persistence is fire-and-forget for
//! callers: a missing or corrupt file just means defaults.

use crate::error::{CamdeckError, Result};
use crate::settings::model::SettingsState;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings persistence backed by a single JSON file
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store for the given settings file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings record
    ///
    /// Returns `None` when the file is missing or unparseable; the caller
    /// falls back to defaults. A corrupt file is logged, never fatal.
    pub fn load(&self) -> Option<SettingsState> {
        if !self.path.exists() {
            info!("Settings file not found, using defaults");
            return None;
        }

        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read settings file, using defaults: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<SettingsState>(&json) {
            Ok(state) => {
                let sane = state.sanitized();
                if sane != state {
                    warn!("Settings file carried out-of-range values, snapped to the legal grid");
                }
                info!("Settings loaded from {}", self.path.display());
                Some(sane)
            }
            Err(e) => {
                warn!("Failed to parse settings file, using defaults: {}", e);
                None
            }
        }
    }

    /// Save the settings record atomically
    pub fn save(&self, state: &SettingsState) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| CamdeckError::SettingsPersistence(
                crate::error::StringError::new("settings path has no parent directory"),
            ))?;
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(state)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| CamdeckError::SettingsPersistence(Box::new(e)))?;

        Ok(())
    }
}
