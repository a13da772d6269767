//! Snapshot persistence for whole record collections.
//!
//! A snapshot is a versioned JSON document holding the full ordered record
//! list. Collections are always rewritten wholesale.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Current on-disk snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Storage backend for an ordered collection of records.
pub trait RecordStore<T>: Send + Sync {
    /// Read the full collection. A missing snapshot yields an empty list.
    fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the persisted collection with `records`.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}

impl<T, S> RecordStore<T> for Arc<S>
where
    S: RecordStore<T> + ?Sized,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        (**self).load()
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        (**self).save(records)
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
struct Snapshot<T> {
    version: u32,
    records: Vec<T>,
}

/// Versioned JSON snapshot file.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T> RecordStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let snapshot: Snapshot<T> =
            serde_json::from_str(&content).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot.records)
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            records,
        })
        .map_err(StoreError::Encode)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        // Write beside the target and rename so readers never see a partial file.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

/// In-memory store for tests and embedding. Saves can be made to fail.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
    fail_saves: AtomicBool,
    save_count: Mutex<usize>,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_saves: AtomicBool::new(false),
            save_count: Mutex::new(0),
        }
    }

    /// Make every subsequent `save` fail with an I/O error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    /// Snapshot of what was last saved.
    pub fn records(&self) -> Vec<T> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.lock().map(|c| *c).unwrap_or_default()
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> RecordStore<T> for MemoryStore<T> {
    fn load(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.records())
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("simulated save failure"),
            });
        }
        if let Ok(mut stored) = self.records.lock() {
            *stored = records.to_vec();
        }
        if let Ok(mut count) = self.save_count.lock() {
            *count += 1;
        }
        Ok(())
    }
}

/// What happened to the persisted copy after a mutation.
///
/// The in-memory collection is authoritative either way.
#[must_use]
#[derive(Debug)]
pub enum SaveOutcome {
    /// The full collection was written.
    Saved,
    /// The operation is not persisted.
    Skipped,
    /// The write failed; the error has already been logged.
    Failed(StoreError),
}

impl SaveOutcome {
    pub(crate) fn from_result(result: Result<(), StoreError>, what: &str) -> Self {
        match result {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                tracing::error!("failed to save {what}: {e}");
                SaveOutcome::Failed(e)
            }
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }

    /// The persistence error, if the save failed.
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            SaveOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Load a collection, degrading any failure to an empty list.
pub(crate) fn load_or_empty<T>(store: &dyn RecordStore<T>, what: &str) -> Vec<T> {
    match store.load() {
        Ok(records) => {
            tracing::debug!("loaded {} {what}", records.len());
            records
        }
        Err(e) => {
            tracing::warn!("could not load {what}, starting empty: {e}");
            Vec::new()
        }
    }
}
