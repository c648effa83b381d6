use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::store::{ensure_data_dir, StoreError};

/// Small bits of state that belong neither in the course store nor in
/// secret storage.
pub trait Preferences: Send + Sync {
    /// When the transcript was last successfully checked, if ever.
    fn last_checked(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn set_last_checked(&self, timestamp: DateTime<Utc>) -> Result<(), StoreError>;
    /// Resets every preference to its default, used at sign-out.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    last_checked: Option<DateTime<Utc>>,
}

/// Preferences kept as a JSON file next to the course store, replaced
/// atomically on every write.
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<PreferencesFile, StoreError> {
        if !self.path.exists() {
            return Ok(PreferencesFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_atomic(&self, prefs: &PreferencesFile) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ensure_data_dir(&dir)?;

        let data = serde_json::to_string_pretty(prefs)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl Preferences for JsonFilePreferences {
    fn last_checked(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.load()?.last_checked)
    }

    fn set_last_checked(&self, timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        let mut prefs = self.load()?;
        prefs.last_checked = Some(timestamp);
        self.write_atomic(&prefs)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.write_atomic(&PreferencesFile::default())
    }
}
