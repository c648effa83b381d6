use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use thiserror::Error;
use torsync_core::Course;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("store io error: {0}")]
    Io(#[from] io::Error),
    #[error("store data corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Ensure the data directory exists; create if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    }
    // Writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    Ok(())
}

/// Staged batch of inserts, updates, and deletes that lands in the
/// store all at once on `commit`, or not at all.
pub trait UnitOfWork {
    fn add(&mut self, courses: &[Course]);
    fn update(&mut self, courses: &[Course]);
    fn remove(&mut self, courses: &[Course]);
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Local course cache.
pub trait CourseStore: Send + Sync {
    /// Every course currently persisted.
    fn all(&self) -> Result<Vec<Course>, StoreError>;
    /// Opens a fresh staging session against this store.
    fn open_unit_of_work(&self) -> Box<dyn UnitOfWork + '_>;
}

/// Course store kept as a single JSON file, replaced atomically on
/// commit (temp file + rename). Commits across store handles for the
/// same file are serialized by the per-store lock; clone handles are
/// not safe for that, use one store instance per file.
pub struct JsonFileCourseStore {
    path: PathBuf,
    commit_lock: Mutex<()>,
}

impl JsonFileCourseStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            commit_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Course>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_atomic(&self, courses: &[Course]) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ensure_data_dir(&dir)?;

        let data = serde_json::to_string_pretty(courses)?;
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

impl CourseStore for JsonFileCourseStore {
    fn all(&self) -> Result<Vec<Course>, StoreError> {
        self.load()
    }

    fn open_unit_of_work(&self) -> Box<dyn UnitOfWork + '_> {
        Box::new(JsonUnitOfWork {
            store: self,
            to_add: Vec::new(),
            to_update: Vec::new(),
            to_remove: Vec::new(),
        })
    }
}

struct JsonUnitOfWork<'a> {
    store: &'a JsonFileCourseStore,
    to_add: Vec<Course>,
    to_update: Vec<Course>,
    to_remove: Vec<Course>,
}

impl UnitOfWork for JsonUnitOfWork<'_> {
    fn add(&mut self, courses: &[Course]) {
        self.to_add.extend_from_slice(courses);
    }

    fn update(&mut self, courses: &[Course]) {
        self.to_update.extend_from_slice(courses);
    }

    fn remove(&mut self, courses: &[Course]) {
        self.to_remove.extend_from_slice(courses);
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        // Concurrent commit cycles must not interleave their staged
        // changes; the whole read-apply-replace runs under the lock.
        let _guard = self
            .store
            .commit_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut courses = self.store.load()?;

        let remove_ids: HashSet<&str> = self.to_remove.iter().map(|c| c.id.as_str()).collect();
        courses.retain(|course| !remove_ids.contains(course.id.as_str()));

        for updated in &self.to_update {
            if let Some(slot) = courses.iter_mut().find(|c| c.id == updated.id) {
                *slot = updated.clone();
            }
        }

        courses.extend(self.to_add.iter().cloned());

        self.store.write_atomic(&courses)
    }
}
