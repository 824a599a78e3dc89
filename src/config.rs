//! Process-wide configuration cache.
//!
//! Configuration is itself a JSON document, read through the crate's own
//! navigator from the first well-known location that loads. Every lookup is
//! memoized independently on first access and falls back to "absent" when
//! the key (or the whole file) is missing.
//!
//! Recognized keys:
//!
//! ```json
//! {
//!   "date-config": { "date-format": "%Y-%m-%d", "timezone": "+02:00" },
//!   "variables": { "host": "example.com" },
//!   "environments": ["dev", "staging"]
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::debug;

use crate::coerce;
use crate::error::AccessError;
use crate::loader::FileCache;
use crate::navigator::Navigator;

/// Preferred configuration file location.
pub const PRIMARY_CONFIG_PATH: &str = "config/docpath.json";
/// Fallback configuration file location.
pub const FALLBACK_CONFIG_PATH: &str = "config/config.json";

const DATE_FORMAT_KEY: &str = "date-config.date-format";
const TIMEZONE_KEY: &str = "date-config.timezone";
const GLOBAL_VARIABLES_KEY: &str = "variables";
const ENVIRONMENTS_KEY: &str = "environments";

/// Lazy per-key cache over the configuration document.
pub struct ConfigCache {
    reader: Option<Navigator>,
    date_format: OnceLock<Option<String>>,
    timezone: OnceLock<Option<String>>,
    global_variables: OnceLock<Option<HashMap<String, Value>>>,
    environments: OnceLock<Option<Vec<String>>>,
}

impl ConfigCache {
    /// Load configuration from the first well-known location that parses.
    /// When neither file loads the configuration is empty, not an error.
    pub fn load() -> Self {
        for path in [PRIMARY_CONFIG_PATH, FALLBACK_CONFIG_PATH] {
            if let Ok(value) = FileCache::shared().load(path) {
                debug!(path, "using configuration file");
                return Self::from_value((*value).clone());
            }
        }

        Self::empty()
    }

    /// Configuration backed by an in-memory document.
    pub fn from_value(value: Value) -> Self {
        Self::with_reader(Some(Navigator::detached(value)))
    }

    /// Configuration with nothing configured.
    pub fn empty() -> Self {
        Self::with_reader(None)
    }

    fn with_reader(reader: Option<Navigator>) -> Self {
        Self {
            reader,
            date_format: OnceLock::new(),
            timezone: OnceLock::new(),
            global_variables: OnceLock::new(),
            environments: OnceLock::new(),
        }
    }

    /// The process-wide configuration, constructed on first use.
    pub fn shared() -> Arc<ConfigCache> {
        static SHARED: OnceLock<Arc<ConfigCache>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(ConfigCache::load())))
    }

    /// Configured date pattern, if any.
    pub fn date_format(&self) -> Option<&str> {
        self.date_format
            .get_or_init(|| self.fetch(|reader| reader.get_string(DATE_FORMAT_KEY)))
            .as_deref()
    }

    /// Configured zone identifier, if any.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone
            .get_or_init(|| self.fetch(|reader| reader.get_string(TIMEZONE_KEY)))
            .as_deref()
    }

    /// Process-wide variables, consulted after every document's local scope.
    pub fn global_variables(&self) -> Option<&HashMap<String, Value>> {
        self.global_variables
            .get_or_init(|| {
                self.fetch(|reader| {
                    reader
                        .get_map_as(GLOBAL_VARIABLES_KEY, |v| Ok(v.clone()))
                        .map(Some)
                })
            })
            .as_ref()
    }

    /// Configured environment list, in priority order.
    pub fn environments(&self) -> Option<&[String]> {
        self.environments
            .get_or_init(|| {
                self.fetch(|reader| {
                    let names = reader
                        .get_list_as(ENVIRONMENTS_KEY, |v| Ok(coerce::to_text(v)))?;
                    Ok(Some(names.into_iter().flatten().collect()))
                })
            })
            .as_deref()
    }

    fn fetch<T>(
        &self,
        read: impl FnOnce(&Navigator) -> Result<Option<T>, AccessError>,
    ) -> Option<T> {
        let reader = self.reader.as_ref()?;
        read(reader).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_config_has_nothing() {
        let config = ConfigCache::empty();

        assert_eq!(config.date_format(), None);
        assert_eq!(config.timezone(), None);
        assert!(config.global_variables().is_none());
        assert!(config.environments().is_none());
    }

    #[test]
    fn test_date_config_keys() {
        let config = ConfigCache::from_value(json!({
            "date-config": {
                "date-format": "%Y/%m/%d",
                "timezone": "+02:00"
            }
        }));

        assert_eq!(config.date_format(), Some("%Y/%m/%d"));
        assert_eq!(config.timezone(), Some("+02:00"));
    }

    #[test]
    fn test_keys_fall_back_independently() {
        let config = ConfigCache::from_value(json!({
            "variables": { "host": "example.com" }
        }));

        assert_eq!(config.date_format(), None);
        let vars = config.global_variables().unwrap();
        assert_eq!(vars.get("host"), Some(&json!("example.com")));
    }

    #[test]
    fn test_environments_in_order() {
        let config = ConfigCache::from_value(json!({
            "environments": ["dev", "staging", "prod"]
        }));

        assert_eq!(
            config.environments(),
            Some(["dev".to_string(), "staging".to_string(), "prod".to_string()].as_slice())
        );
    }

    #[test]
    fn test_non_map_variables_absent() {
        let config = ConfigCache::from_value(json!({
            "variables": ["not", "a", "map"]
        }));

        assert!(config.global_variables().is_none());
    }
}
