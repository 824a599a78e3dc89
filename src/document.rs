//! Entry points for reading JSON documents.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::LoadError;
use crate::loader::FileCache;
use crate::navigator::Navigator;

/// Read a JSON document file through the shared file cache.
pub fn read_file(path: impl AsRef<Path>) -> Result<Navigator, LoadError> {
    let value = FileCache::shared().load(path)?;
    Ok(Navigator::new((*value).clone()))
}

/// Read a JSON document from text.
pub fn read_str(text: &str) -> Result<Navigator, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(Navigator::new(value))
}

/// Read an already-parsed document tree.
pub fn read_value(value: Value) -> Navigator {
    Navigator::new(value)
}

enum Source {
    File(PathBuf),
    Value(Value),
}

/// Handle on a document source, managing its slot in the shared file cache.
pub struct Document {
    source: Source,
}

impl Document {
    /// Document backed by a file on disk.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    /// Document backed by an in-memory tree.
    pub fn from_value(value: Value) -> Self {
        Self {
            source: Source::Value(value),
        }
    }

    /// Read the document, loading and caching the file on first use.
    pub fn read(&self) -> Result<Navigator, LoadError> {
        match &self.source {
            Source::File(path) => read_file(path),
            Source::Value(value) => Ok(Navigator::new(value.clone())),
        }
    }

    /// Drop this document's cached parse, forcing a reload on the next read.
    pub fn close(&self) {
        if let Source::File(path) = &self.source {
            FileCache::shared().evict(path);
        }
    }

    /// Drop every cached document.
    pub fn close_all() {
        FileCache::shared().clear();
    }
}
