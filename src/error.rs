//! Error types for document access and loading.

use std::fmt;

/// Error type for path resolution, coercion, and record mapping.
#[derive(Debug, Clone)]
pub enum AccessError {
    /// Path was empty, a map key was absent, or a list index was out of bounds.
    InvalidKey(String),
    /// A map-shaped operation hit a value that is not a map.
    NotAMap(String),
    /// A list-shaped operation hit a value that is not a list.
    NotAList(String),
    /// A path segment does not match the key/bracket grammar.
    PathSyntax(String),
    /// A primitive coercion failed (bad text, wrong shape).
    Parse {
        value: String,
        target: &'static str,
    },
    /// A date string does not match the resolved pattern, or the zone
    /// identifier is unknown.
    DateFormat(String),
    /// A record field could not be assigned: type mismatch between the
    /// resolved value and the field's declared type.
    InvalidRecord {
        field: String,
        reason: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            AccessError::NotAMap(msg) => write!(f, "Not a map: {}", msg),
            AccessError::NotAList(msg) => write!(f, "Not a list: {}", msg),
            AccessError::PathSyntax(msg) => write!(f, "Path syntax error: {}", msg),
            AccessError::Parse { value, target } => {
                write!(f, "Can't parse [{}] as {}", value, target)
            }
            AccessError::DateFormat(msg) => write!(f, "Date format error: {}", msg),
            AccessError::InvalidRecord { field, reason } => {
                write!(f, "Can't populate field '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Error type for document loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidPath(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "JSON error: {}", e),
            LoadError::InvalidPath(msg) => write!(f, "Invalid path: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_display() {
        let err = AccessError::InvalidKey("key [port] does not exist".to_string());
        assert_eq!(err.to_string(), "Invalid key: key [port] does not exist");

        let err = AccessError::Parse {
            value: "text".to_string(),
            target: "i32",
        };
        assert_eq!(err.to_string(), "Can't parse [text] as i32");
    }

    #[test]
    fn test_load_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
