//! Best-effort persistence of the last-used directory and quality

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the preference record, relative to the working directory
pub const PREFERENCES_FILE: &str = "downloader_config.json";

/// Persisted user defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Keys this version does not know about; written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PreferenceRecord {
    pub fn is_empty(&self) -> bool {
        self.download_location.is_none() && self.quality.is_none() && self.extra.is_empty()
    }
}

/// What reading the preference file produced
#[derive(Debug)]
enum LoadOutcome {
    Loaded(PreferenceRecord),
    Missing,
    Corrupt(String),
}

/// Reads and writes the preference record. Never fails the caller.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new(PREFERENCES_FILE)
    }
}

impl PreferenceStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record; missing or malformed files give an empty record
    pub fn load(&self) -> PreferenceRecord {
        match self.try_load() {
            LoadOutcome::Loaded(record) => {
                debug!("Loaded preferences from {}", self.path.display());
                record
            }
            LoadOutcome::Missing => {
                debug!("No preferences at {}", self.path.display());
                PreferenceRecord::default()
            }
            LoadOutcome::Corrupt(reason) => {
                debug!("Ignoring unreadable preferences at {}: {}", self.path.display(), reason);
                PreferenceRecord::default()
            }
        }
    }

    fn try_load(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };
        match serde_json::from_str(&content) {
            Ok(record) => LoadOutcome::Loaded(record),
            Err(e) => LoadOutcome::Corrupt(e.to_string()),
        }
    }

    /// Overwrite the file with the record; failures are only logged
    pub fn save(&self, record: &PreferenceRecord) {
        let result = serde_json::to_string_pretty(record)
            .map_err(std::io::Error::from)
            .and_then(|content| fs::write(&self.path, content));
        match result {
            Ok(()) => debug!("Saved preferences to {}", self.path.display()),
            Err(e) => debug!("Could not save preferences to {}: {}", self.path.display(), e),
        }
    }
}
