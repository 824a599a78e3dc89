//! # Docpath: Dynamic JSON Document Accessor
//!
//! Docpath navigates parsed JSON documents with a compact path expression
//! language, coerces values to typed results, substitutes `${name}`
//! variables inline, and materializes caller-defined records field by field.
//!
//! ## Features
//!
//! - **Path expressions**: dot/bracket navigation (`servers[0].host`) over
//!   nested maps, lists, and scalars
//! - **Typed coercion**: string, integer, long (trailing-`L` aware), double,
//!   boolean, and date projections with strict failure semantics
//! - **Variable substitution**: document-local `variables` shadow
//!   process-wide configured variables; whole-value placeholders jump into
//!   shared sub-trees
//! - **Record mapping**: populate arbitrary `Default` structs through
//!   ordered field descriptors, with custom per-field coercions and nested
//!   record registration
//! - **Environment keys**: `key@env` variants selected by the configured
//!   environment list on whole-map materialization
//!
//! ## Example
//!
//! ```
//! use docpath::read_str;
//!
//! let navigator = read_str(r#"{
//!     "variables": { "host": "example.com" },
//!     "service": {
//!         "url": "https://${host}/api",
//!         "port": 8080,
//!         "replicas": ["a", "b"]
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(
//!     navigator.get_string("service.url").unwrap(),
//!     Some("https://example.com/api".to_string())
//! );
//! assert_eq!(navigator.get_integer("service.port").unwrap(), Some(8080));
//! assert_eq!(
//!     navigator.get("service.replicas[1]").unwrap(),
//!     serde_json::json!("b")
//! );
//! ```

// Core modules
pub mod coerce;
pub mod env;
pub mod error;
pub mod mapper;
pub mod navigator;
pub mod path;
pub mod record;
pub mod vars;

// Document sources and configuration
pub mod config;
pub mod document;
pub mod loader;

// Re-export key types
pub use config::{ConfigCache, FALLBACK_CONFIG_PATH, PRIMARY_CONFIG_PATH};
pub use document::{read_file, read_str, read_value, Document};
pub use error::{AccessError, LoadError};
pub use loader::FileCache;
pub use mapper::{MapperOptions, NestedType};
pub use navigator::{Navigator, VARIABLES_KEY};
pub use path::{KeyPath, Segment};
pub use record::{FieldKind, FieldPayload, FieldSpec, Record};

pub use coerce::DEFAULT_DATE_FORMAT;
