//! Saved-data stores: small key/value strings that survive restarts.
//!
//! The location manager uses a single key, [`LAST_COORDS_KEY`], to remember
//! the last real coordinate. Hosts plug in whatever storage they have by
//! implementing [`SavedData`]; two implementations ship here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::GeoError;

/// Key under which the last real coordinate is stored.
pub const LAST_COORDS_KEY: &str = "LastCoords";

/// Key/value persistence for small strings.
pub trait SavedData: Send + Sync {
    /// Returns the stored value, or `default` if there is none.
    fn get_saved_data(&self, key: &str, default: &str) -> String;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_saved_data(&self, key: &str, value: &str) -> Result<(), GeoError>;
}

impl<S: SavedData + ?Sized> SavedData for Box<S> {
    fn get_saved_data(&self, key: &str, default: &str) -> String {
        (**self).get_saved_data(key, default)
    }

    fn set_saved_data(&self, key: &str, value: &str) -> Result<(), GeoError> {
        (**self).set_saved_data(key, value)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while the location manager owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.insert(key, value);
        store
    }

    fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl SavedData for MemoryStore {
    fn get_saved_data(&self, key: &str, default: &str) -> String {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_saved_data(&self, key: &str, value: &str) -> Result<(), GeoError> {
        self.insert(key, value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One file per key inside a directory: `<dir>/<key>.txt`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir`, creating it on first write if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl SavedData for FileStore {
    fn get_saved_data(&self, key: &str, default: &str) -> String {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => value.trim_end().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => default.to_string(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read saved data");
                default.to_string()
            }
        }
    }

    fn set_saved_data(&self, key: &str, value: &str) -> Result<(), GeoError> {
        std::fs::create_dir_all(&self.dir).map_err(GeoError::Store)?;
        std::fs::write(self.path_for(key), value).map_err(GeoError::Store)
    }
}
