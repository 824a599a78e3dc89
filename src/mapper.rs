//! Materialization of typed records from document sub-trees.
//!
//! The mapper walks a record's field descriptors, resolves
//! `path + "." + field` for each one, and assigns the coerced result.
//! Absent fields keep their default value; a present field that does not
//! fit its declared kind fails the whole call.

use std::any::Any;
use std::collections::HashMap;

use serde_json::Value;

use crate::coerce;
use crate::error::AccessError;
use crate::navigator::Navigator;
use crate::record::{FieldKind, FieldPayload, Record};

type CustomCoercion = Box<dyn Fn(&Value) -> Result<Box<dyn Any>, AccessError>>;
type NestedBuilder = fn(&Navigator, &str, &MapperOptions) -> Result<Box<dyn Any>, AccessError>;

/// A record type registered for nested materialization, matched by its
/// `Record::NAME`.
pub struct NestedType {
    name: &'static str,
    build: NestedBuilder,
}

impl NestedType {
    pub fn of<R: Record>() -> Self {
        Self {
            name: R::NAME,
            build: build_nested::<R>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

fn build_nested<R: Record>(
    navigator: &Navigator,
    path: &str,
    options: &MapperOptions,
) -> Result<Box<dyn Any>, AccessError> {
    Ok(Box::new(navigator.get_record_with::<R>(path, options)?))
}

/// Options for record materialization: per-field coercion overrides, date
/// pattern/zone overrides, and the registry of nested record types.
#[derive(Default)]
pub struct MapperOptions {
    custom: HashMap<String, CustomCoercion>,
    date_format: Option<String>,
    timezone: Option<String>,
    nested: Vec<NestedType>,
}

impl MapperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override handling of the named field with a caller-supplied
    /// coercion. The coercion's result must match the field's concrete
    /// type, checked at assignment.
    pub fn coerce_field<V, F>(mut self, name: impl Into<String>, coercion: F) -> Self
    where
        V: 'static,
        F: Fn(&Value) -> Result<V, AccessError> + 'static,
    {
        self.custom.insert(
            name.into(),
            Box::new(move |value| Ok(Box::new(coercion(value)?) as Box<dyn Any>)),
        );
        self
    }

    /// Date pattern for date fields, overriding the configuration.
    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }

    /// Zone identifier for date fields, overriding the configuration.
    pub fn timezone(mut self, zone: impl Into<String>) -> Self {
        self.timezone = Some(zone.into());
        self
    }

    /// Register a record type usable for nested record fields. A record
    /// used both as the top type and inside itself must be registered too.
    pub fn nested<R: Record>(mut self) -> Self {
        self.nested.push(NestedType::of::<R>());
        self
    }

    fn find_nested(&self, name: &str) -> Option<&NestedType> {
        self.nested.iter().find(|n| n.name == name)
    }
}

impl Navigator {
    /// Materialize a record at `path` with default options.
    pub fn get_record<R: Record>(&self, path: &str) -> Result<R, AccessError> {
        self.get_record_with(path, &MapperOptions::new())
    }

    /// Materialize a record at `path`.
    ///
    /// Every declared field is looked up at `path + "." + name`; a missing
    /// key leaves the field at its default value and never fails the call.
    pub fn get_record_with<R: Record>(
        &self,
        path: &str,
        options: &MapperOptions,
    ) -> Result<R, AccessError> {
        let mut record = R::default();

        for field in R::fields() {
            let sub_path = format!("{}.{}", path, field.name());

            let fetched = match self.get(&sub_path) {
                Ok(value) => value,
                Err(AccessError::InvalidKey(_)) => continue,
                Err(err) => return Err(err),
            };

            let payload = self.prepare(&fetched, &sub_path, field.name(), field.kind(), options)?;
            field.assign(&mut record, payload)?;
        }

        Ok(record)
    }

    fn prepare(
        &self,
        value: &Value,
        sub_path: &str,
        name: &str,
        kind: &FieldKind,
        options: &MapperOptions,
    ) -> Result<FieldPayload, AccessError> {
        if let Some(coercion) = options.custom.get(name) {
            return Ok(FieldPayload::Custom(coercion(value)?));
        }

        if value.is_null() {
            return Ok(FieldPayload::Null);
        }

        match kind {
            FieldKind::Text => Ok(coerce::to_text(value)
                .map(|text| FieldPayload::Text(self.substitute(&text)))
                .unwrap_or(FieldPayload::Null)),
            FieldKind::Integer => Ok(coerce::to_i32(value)?
                .map(FieldPayload::Integer)
                .unwrap_or(FieldPayload::Null)),
            FieldKind::Long => Ok(coerce::to_i64(value)?
                .map(FieldPayload::Long)
                .unwrap_or(FieldPayload::Null)),
            FieldKind::Double => Ok(coerce::to_f64(value)?
                .map(FieldPayload::Double)
                .unwrap_or(FieldPayload::Null)),
            FieldKind::Boolean => Ok(coerce::to_bool(value)?
                .map(FieldPayload::Boolean)
                .unwrap_or(FieldPayload::Null)),
            FieldKind::Date => {
                let text = match coerce::to_text(value) {
                    Some(text) => text,
                    None => return Ok(FieldPayload::Null),
                };
                let pattern = self.resolve_date_format(options.date_format.as_deref());
                let zone = self.resolve_timezone(options.timezone.as_deref());
                coerce::parse_date(&text, &pattern, zone.as_deref()).map(FieldPayload::Date)
            }
            FieldKind::Record { record } => match options.find_nested(record) {
                Some(nested) => Ok(FieldPayload::Nested((nested.build)(
                    self, sub_path, options,
                )?)),
                None => Ok(FieldPayload::Raw(value.clone())),
            },
            FieldKind::RecordList { record } => match options.find_nested(record) {
                Some(nested) => {
                    let items = value.as_array().ok_or_else(|| {
                        AccessError::NotAList(format!("expected a list at [{}]", sub_path))
                    })?;

                    let mut built = Vec::with_capacity(items.len());
                    for index in 0..items.len() {
                        let item_path = format!("{}[{}]", sub_path, index);
                        built.push((nested.build)(self, &item_path, options)?);
                    }
                    Ok(FieldPayload::NestedList(built))
                }
                None => Ok(FieldPayload::Raw(value.clone())),
            },
            FieldKind::RecordMap { record } => match options.find_nested(record) {
                Some(nested) => {
                    let entries = value.as_object().ok_or_else(|| {
                        AccessError::NotAMap(format!("expected a map at [{}]", sub_path))
                    })?;

                    let mut built = HashMap::with_capacity(entries.len());
                    for key in entries.keys() {
                        let entry_path = format!("{}.{}", sub_path, key);
                        built.insert(key.clone(), (nested.build)(self, &entry_path, options)?);
                    }
                    Ok(FieldPayload::NestedMap(built))
                }
                None => Ok(FieldPayload::Raw(value.clone())),
            },
            FieldKind::Parsed => Ok(FieldPayload::Raw(value.clone())),
        }
    }
}
