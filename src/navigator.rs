//! Path-based navigation over a parsed JSON document tree.
//!
//! A [`Navigator`] owns a document tree and resolves path expressions
//! against it, producing owned projections. The tree itself is never
//! mutated; a navigator can be shared freely across threads.
//!
//! Variable placeholders are resolved during navigation: a string node that
//! is exactly `${name}` jumps into the named sub-tree from the document's
//! `variables` map, and string results have embedded `${name}` occurrences
//! replaced from the local scope, then the configured global scope.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::coerce::{self, DEFAULT_DATE_FORMAT};
use crate::config::ConfigCache;
use crate::env::rewrite_env_keys;
use crate::error::AccessError;
use crate::path::{KeyPath, Segment};
use crate::vars;

/// Key under the document root holding the document-local variable scope.
pub const VARIABLES_KEY: &str = "variables";

/// Read-only accessor over a document tree.
#[derive(Clone)]
pub struct Navigator {
    data: Value,
    vars: HashMap<String, Value>,
    enable_env: bool,
    config: Option<Arc<ConfigCache>>,
}

impl Navigator {
    /// Navigator over `data` with the process-wide configuration and
    /// environment-key rewriting enabled.
    pub fn new(data: Value) -> Self {
        Self::build(data, true, Some(ConfigCache::shared()))
    }

    /// Navigator over `data` with an explicit configuration handle.
    pub fn with_config(data: Value, config: Arc<ConfigCache>) -> Self {
        Self::build(data, true, Some(config))
    }

    /// Navigator with no configuration attached: no global variables, no
    /// environment rewriting, built-in date defaults.
    pub fn detached(data: Value) -> Self {
        Self::build(data, false, None)
    }

    fn build(data: Value, enable_env: bool, config: Option<Arc<ConfigCache>>) -> Self {
        let mut navigator = Self {
            data,
            vars: HashMap::new(),
            enable_env,
            config,
        };
        navigator.vars = navigator.load_variables();
        navigator
    }

    // An absent or non-map "variables" entry means an empty scope, never a
    // construction failure.
    fn load_variables(&self) -> HashMap<String, Value> {
        match self.get_map_as(VARIABLES_KEY, |v| Ok(v.clone())) {
            Ok(map) => self.rewrite_if_enabled(map),
            Err(_) => HashMap::new(),
        }
    }

    /// The whole tree.
    pub fn root(&self) -> &Value {
        &self.data
    }

    /// A navigator re-rooted at the value of `path`, sharing this one's
    /// variable scope and configuration.
    pub fn break_point(&self, path: &str) -> Result<Navigator, AccessError> {
        Ok(Self {
            data: self.get(path)?,
            vars: self.vars.clone(),
            enable_env: self.enable_env,
            config: self.config.clone(),
        })
    }

    /// Resolve a path expression to the value it addresses.
    ///
    /// A single bracket-free segment is a plain keyed lookup on the root.
    /// Longer paths walk segment by segment: map keys descend into maps
    /// (`NotAMap` on a non-map, `InvalidKey` on a missing key) and bracketed
    /// indices descend into lists (`NotAList` on a non-list, `InvalidKey`
    /// past the end).
    pub fn get(&self, path: &str) -> Result<Value, AccessError> {
        if path.is_empty() {
            return Err(AccessError::InvalidKey("path is empty".to_string()));
        }

        let parsed = KeyPath::parse(path)?;
        let segments = &parsed.segments;

        if segments.len() == 1 && !segments[0].has_indices() {
            return self.lookup_key(&self.data, &segments[0].key);
        }

        let mut current = self.data.clone();
        for segment in segments {
            current = self.jump(current);
            current = if segment.has_indices() {
                self.step_indexed(current, segment)?
            } else {
                self.lookup_key(&current, &segment.key)?
            };
        }

        Ok(current)
    }

    /// Resolve `path` to text, with embedded variable substitution applied.
    /// Non-string scalars and branches render as their canonical text.
    pub fn get_string(&self, path: &str) -> Result<Option<String>, AccessError> {
        let value = self.get(path)?;
        Ok(coerce::to_text(&value).map(|text| self.substitute(&text)))
    }

    /// Resolve `path` to an `i32`.
    pub fn get_integer(&self, path: &str) -> Result<Option<i32>, AccessError> {
        coerce::to_i32(&self.get(path)?)
    }

    /// Resolve `path` to an `i64`. String values may carry a trailing `L`.
    pub fn get_long(&self, path: &str) -> Result<Option<i64>, AccessError> {
        coerce::to_i64(&self.get(path)?)
    }

    /// Resolve `path` to an `f64`.
    pub fn get_double(&self, path: &str) -> Result<Option<f64>, AccessError> {
        coerce::to_f64(&self.get(path)?)
    }

    /// Resolve `path` to a boolean.
    pub fn get_boolean(&self, path: &str) -> Result<Option<bool>, AccessError> {
        coerce::to_bool(&self.get(path)?)
    }

    /// Resolve `path` to a date using the configured pattern and zone when
    /// present, or the built-in defaults.
    pub fn get_date(&self, path: &str) -> Result<Option<DateTime<FixedOffset>>, AccessError> {
        self.get_date_with(path, None, None)
    }

    /// Resolve `path` to a date. Explicit `pattern`/`zone` win over the
    /// configuration, which wins over the defaults (see
    /// [`DEFAULT_DATE_FORMAT`] and the local zone).
    pub fn get_date_with(
        &self,
        path: &str,
        pattern: Option<&str>,
        zone: Option<&str>,
    ) -> Result<Option<DateTime<FixedOffset>>, AccessError> {
        let text = match self.get_string(path)? {
            Some(text) => text,
            None => return Ok(None),
        };

        let pattern = self.resolve_date_format(pattern);
        let zone = self.resolve_timezone(zone);
        coerce::parse_date(&text, &pattern, zone.as_deref()).map(Some)
    }

    /// Resolve `path` and apply an arbitrary coercion to the raw value.
    pub fn get_as<T, F>(&self, path: &str, coercion: F) -> Result<T, AccessError>
    where
        F: Fn(&Value) -> Result<T, AccessError>,
    {
        coercion(&self.get(path)?)
    }

    /// Resolve `path` to a list and coerce every element. `"."` addresses
    /// the whole tree.
    pub fn get_list_as<T, F>(&self, path: &str, coercion: F) -> Result<Vec<T>, AccessError>
    where
        F: Fn(&Value) -> Result<T, AccessError>,
    {
        if path == "." {
            return list_of(&self.data, &coercion);
        }

        list_of(&self.get(path)?, &coercion)
    }

    /// Resolve `path` to a map and coerce every value. `"."` addresses the
    /// whole tree, with environment-key rewriting applied when enabled.
    pub fn get_map_as<T, F>(&self, path: &str, coercion: F) -> Result<HashMap<String, T>, AccessError>
    where
        F: Fn(&Value) -> Result<T, AccessError>,
    {
        if path == "." {
            let map = map_of(&self.data, &coercion)?;
            return Ok(self.rewrite_if_enabled(map));
        }

        map_of(&self.get(path)?, &coercion)
    }

    pub(crate) fn substitute(&self, text: &str) -> String {
        vars::substitute(text, &self.vars, self.globals())
    }

    pub(crate) fn resolve_date_format(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| {
                self.config
                    .as_ref()
                    .and_then(|c| c.date_format().map(str::to_string))
            })
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string())
    }

    pub(crate) fn resolve_timezone(&self, explicit: Option<&str>) -> Option<String> {
        explicit.map(str::to_string).or_else(|| {
            self.config
                .as_ref()
                .and_then(|c| c.timezone().map(str::to_string))
        })
    }

    fn globals(&self) -> Option<&HashMap<String, Value>> {
        self.config.as_ref().and_then(|c| c.global_variables())
    }

    fn rewrite_if_enabled<T>(&self, map: HashMap<String, T>) -> HashMap<String, T> {
        if !self.enable_env {
            return map;
        }

        match self.config.as_ref().and_then(|c| c.environments()) {
            Some(environments) => rewrite_env_keys(map, environments),
            None => map,
        }
    }

    fn step_indexed(&self, mut current: Value, segment: &Segment) -> Result<Value, AccessError> {
        if !segment.key.is_empty() {
            current = self.lookup_key(&current, &segment.key)?;
        }

        current = self.jump(current);
        for &index in &segment.indices {
            current = lookup_index(&current, index)?;
        }

        Ok(current)
    }

    // Whole-value placeholder substitution against the local scope.
    fn jump(&self, value: Value) -> Value {
        match vars::resolve_placeholder(&value, &self.vars) {
            Some(replacement) => replacement.clone(),
            None => value,
        }
    }

    fn lookup_key(&self, value: &Value, key: &str) -> Result<Value, AccessError> {
        let map = value
            .as_object()
            .ok_or_else(|| AccessError::NotAMap(format!("expected a map, found [{}]", value)))?;

        map.get(key).cloned().ok_or_else(|| {
            AccessError::InvalidKey(format!("key [{}] does not exist in [{}]", key, value))
        })
    }
}

fn lookup_index(value: &Value, index: usize) -> Result<Value, AccessError> {
    let list = value
        .as_array()
        .ok_or_else(|| AccessError::NotAList(format!("expected a list, found [{}]", value)))?;

    list.get(index).cloned().ok_or_else(|| {
        AccessError::InvalidKey(format!(
            "index [{}] is out of the boundary of [{}]",
            index, value
        ))
    })
}

fn list_of<T, F>(value: &Value, coercion: &F) -> Result<Vec<T>, AccessError>
where
    F: Fn(&Value) -> Result<T, AccessError>,
{
    let items = value
        .as_array()
        .ok_or_else(|| AccessError::NotAList(format!("expected a list, found [{}]", value)))?;

    items.iter().map(coercion).collect()
}

fn map_of<T, F>(value: &Value, coercion: &F) -> Result<HashMap<String, T>, AccessError>
where
    F: Fn(&Value) -> Result<T, AccessError>,
{
    let entries = value
        .as_object()
        .ok_or_else(|| AccessError::NotAMap(format!("expected a map, found [{}]", value)))?;

    entries
        .iter()
        .map(|(key, item)| Ok((key.clone(), coercion(item)?)))
        .collect()
}
