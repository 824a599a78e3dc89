//! Record descriptors for typed materialization of document sub-trees.
//!
//! A [`Record`] is any `Default` type that declares its fields as an ordered
//! list of [`FieldSpec`] descriptors. Each descriptor pairs a field name and
//! declared [`FieldKind`] with a setter closure; the mapper prepares a
//! [`FieldPayload`] per the kind and hands it to the setter. Nested record
//! types are carried as boxed `Any` values and downcast at assignment, so a
//! mismatched registration surfaces as an [`AccessError::InvalidRecord`]
//! rather than silently picking a type.

use std::any::Any;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AccessError;

/// A caller-defined structure the mapper can populate field by field.
pub trait Record: Default + 'static {
    /// Name of this record type, matched exactly against nested-type
    /// registrations.
    const NAME: &'static str;

    /// Field descriptors, in declaration order.
    fn fields() -> Vec<FieldSpec<Self>>;
}

/// Declared shape of a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Text with embedded variable substitution
    Text,
    /// 32-bit integer
    Integer,
    /// 64-bit integer, trailing-`L` aware
    Long,
    /// 64-bit float
    Double,
    /// Boolean
    Boolean,
    /// Date parsed with the resolved pattern and zone
    Date,
    /// A nested record of the named type
    Record { record: &'static str },
    /// A list of nested records of the named type
    RecordList { record: &'static str },
    /// A map of nested records of the named type
    RecordMap { record: &'static str },
    /// Deserialized from the raw tree value
    Parsed,
}

/// Value prepared by the mapper for one field assignment.
pub enum FieldPayload {
    Null,
    Text(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
    Nested(Box<dyn Any>),
    NestedList(Vec<Box<dyn Any>>),
    NestedMap(HashMap<String, Box<dyn Any>>),
    Raw(Value),
    Custom(Box<dyn Any>),
}

type Setter<T> = Box<dyn Fn(&mut T, FieldPayload) -> Result<(), AccessError>>;

/// Descriptor binding a field name and kind to a typed setter.
pub struct FieldSpec<T> {
    name: &'static str,
    kind: FieldKind,
    setter: Setter<T>,
}

fn mismatch(field: &'static str, expected: &str) -> AccessError {
    AccessError::InvalidRecord {
        field: field.to_string(),
        reason: format!("value does not convert to {}", expected),
    }
}

fn downcast<V: 'static>(field: &'static str, any: Box<dyn Any>) -> Result<V, AccessError> {
    any.downcast::<V>()
        .map(|boxed| *boxed)
        .map_err(|_| mismatch(field, std::any::type_name::<V>()))
}

impl<T> FieldSpec<T> {
    /// The field's name, also its key in the document.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's declared kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub(crate) fn assign(&self, target: &mut T, payload: FieldPayload) -> Result<(), AccessError> {
        (self.setter)(target, payload)
    }

    /// A text field. Embedded `${name}` placeholders in the value are
    /// substituted before assignment.
    pub fn text(name: &'static str, set: impl Fn(&mut T, Option<String>) + 'static) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Text(text) => {
                    set(target, Some(text));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<String>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "String")),
            }),
        }
    }

    /// A 32-bit integer field.
    pub fn integer(name: &'static str, set: impl Fn(&mut T, Option<i32>) + 'static) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Integer(n) => {
                    set(target, Some(n));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<i32>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "i32")),
            }),
        }
    }

    /// A 64-bit integer field; string values may carry a trailing `L`.
    pub fn long(name: &'static str, set: impl Fn(&mut T, Option<i64>) + 'static) -> Self {
        Self {
            name,
            kind: FieldKind::Long,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Long(n) => {
                    set(target, Some(n));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<i64>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "i64")),
            }),
        }
    }

    /// A 64-bit float field.
    pub fn double(name: &'static str, set: impl Fn(&mut T, Option<f64>) + 'static) -> Self {
        Self {
            name,
            kind: FieldKind::Double,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Double(n) => {
                    set(target, Some(n));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<f64>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "f64")),
            }),
        }
    }

    /// A boolean field.
    pub fn boolean(name: &'static str, set: impl Fn(&mut T, Option<bool>) + 'static) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Boolean(b) => {
                    set(target, Some(b));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<bool>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "bool")),
            }),
        }
    }

    /// A date field, parsed with the mapper's resolved pattern and zone.
    pub fn date(
        name: &'static str,
        set: impl Fn(&mut T, Option<DateTime<FixedOffset>>) + 'static,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Date(date) => {
                    set(target, Some(date));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<DateTime<FixedOffset>>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, "DateTime")),
            }),
        }
    }

    /// A nested record field. `R` must be registered with the mapper for
    /// the recursion to happen; otherwise assignment fails.
    pub fn record<R: Record>(
        name: &'static str,
        set: impl Fn(&mut T, Option<R>) + 'static,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Record { record: R::NAME },
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Nested(any) | FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<R>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, R::NAME)),
            }),
        }
    }

    /// A list of nested records, one per document list element, in order.
    pub fn record_list<R: Record>(
        name: &'static str,
        set: impl Fn(&mut T, Option<Vec<R>>) + 'static,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::RecordList { record: R::NAME },
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::NestedList(items) => {
                    let mut list = Vec::with_capacity(items.len());
                    for any in items {
                        list.push(downcast::<R>(name, any)?);
                    }
                    set(target, Some(list));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<Vec<R>>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, R::NAME)),
            }),
        }
    }

    /// A map of nested records, one per document map key.
    pub fn record_map<R: Record>(
        name: &'static str,
        set: impl Fn(&mut T, Option<HashMap<String, R>>) + 'static,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::RecordMap { record: R::NAME },
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::NestedMap(entries) => {
                    let mut map = HashMap::with_capacity(entries.len());
                    for (key, any) in entries {
                        map.insert(key, downcast::<R>(name, any)?);
                    }
                    set(target, Some(map));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<HashMap<String, R>>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, R::NAME)),
            }),
        }
    }

    /// A field deserialized straight from the raw tree value. The generic
    /// fallback for shapes with no dedicated kind (scalar lists, plain
    /// maps, any `Deserialize` type).
    pub fn parsed<V: DeserializeOwned + 'static>(
        name: &'static str,
        set: impl Fn(&mut T, Option<V>) + 'static,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Parsed,
            setter: Box::new(move |target, payload| match payload {
                FieldPayload::Null => {
                    set(target, None);
                    Ok(())
                }
                FieldPayload::Raw(value) => {
                    let parsed =
                        serde_json::from_value::<V>(value).map_err(|err| {
                            AccessError::InvalidRecord {
                                field: name.to_string(),
                                reason: err.to_string(),
                            }
                        })?;
                    set(target, Some(parsed));
                    Ok(())
                }
                FieldPayload::Custom(any) => {
                    set(target, Some(downcast::<V>(name, any)?));
                    Ok(())
                }
                _ => Err(mismatch(name, std::any::type_name::<V>())),
            }),
        }
    }
}
