//! Memoizing loader for JSON document files.
//!
//! Documents are parsed once per path and shared as `Arc<Value>` until
//! evicted. Paths without a `.json` extension get one appended.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;

/// Load-once cache of parsed JSON documents, keyed by file path.
pub struct FileCache {
    entries: Mutex<HashMap<PathBuf, Arc<Value>>>,
}

impl FileCache {
    /// Create a standalone cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide cache used by the document entry points.
    pub fn shared() -> &'static FileCache {
        static SHARED: OnceLock<FileCache> = OnceLock::new();
        SHARED.get_or_init(FileCache::new)
    }

    /// Load and parse the document at `path`, or return the cached parse.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Value>, LoadError> {
        let path = prepare_file_path(path.as_ref())?;

        if let Some(found) = self.entries().get(&path).cloned() {
            return Ok(found);
        }

        let contents = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&contents)?;
        let value = Arc::new(value);

        debug!(path = %path.display(), "loaded document");
        self.entries().insert(path, Arc::clone(&value));
        Ok(value)
    }

    /// Drop the cached parse for `path`, if any.
    pub fn evict(&self, path: impl AsRef<Path>) {
        if let Ok(path) = prepare_file_path(path.as_ref()) {
            self.entries().remove(&path);
        }
    }

    /// Drop every cached parse.
    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Value>>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a document path: reject empty paths, append `.json` when the
/// extension is missing.
fn prepare_file_path(path: &Path) -> Result<PathBuf, LoadError> {
    if path.as_os_str().is_empty() {
        return Err(LoadError::InvalidPath(
            "file path can't be empty".to_string(),
        ));
    }

    let text = path.to_string_lossy();
    if text.ends_with(".json") {
        Ok(path.to_path_buf())
    } else {
        Ok(PathBuf::from(format!("{}.json", text)))
    }
}
