//! Synchronous shape check of raw schema input.
//!
//! Raw input is dispatched by shape:
//!
//! | raw input               | node kind    |
//! |-------------------------|--------------|
//! | string                  | type         |
//! | sequence                | alternatives |
//! | object with `items`     | array        |
//! | any other object        | value        |
//!
//! Every node is checked against the minimal keys its kind requires. The
//! whole tree is checked before any loading starts, so a malformed schema
//! never triggers a loader call.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::meta::{Meta, Validation};
use crate::node::SchemaKind;

/// Shape-checked, unresolved schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSchema {
    /// Nominal reference to a named type.
    Reference(String),
    Alternatives(RawAlternatives),
    Array(RawArray),
    Value(RawValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAlternatives {
    pub alternatives: Vec<RawProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawArray {
    pub items: Box<RawSchema>,
    pub validation: Option<Validation>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawValue {
    /// Parents in declaration order; a single parent is normalized to one entry.
    pub extend: Vec<RawSchema>,
    pub properties: BTreeMap<String, RawProperty>,
    pub validation: Option<Validation>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawProperty {
    pub meta: Option<Meta>,
    pub schema: Box<RawSchema>,
}

const ARRAY_KEYS: &[&str] = &["items", "validation", "meta"];
const PROPERTY_KEYS: &[&str] = &["meta", "schema"];
const ALTERNATIVES_KEYS: &[&str] = &["alternatives"];

impl RawSchema {
    /// Shape-check a raw schema, dispatching on its shape.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Shape`] naming the first offending node.
    pub fn parse(raw: &Value) -> Result<Self, SchemaError> {
        Self::parse_at(raw, "$")
    }

    /// Shape-check an alternatives schema given either as a sequence or as
    /// the normalized `{"alternatives": [...]}` object.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Shape`] when `alternatives` is missing or not
    /// a sequence.
    pub fn parse_alternatives(raw: &Value) -> Result<Self, SchemaError> {
        RawAlternatives::parse(raw, "$").map(Self::Alternatives)
    }

    /// Shape-check a schema that must be an array.
    ///
    /// Shape dispatch sends an object without `items` to a value node; this
    /// entry point holds it to the array shape instead.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Shape`] when `raw` is not an object, carries a
    /// key arrays do not accept, or lacks `items`.
    pub fn parse_array(raw: &Value) -> Result<Self, SchemaError> {
        match raw {
            Value::Object(object) => RawArray::parse(object, "$").map(Self::Array),
            _ => Err(SchemaError::shape(
                SchemaKind::Array,
                "$",
                "array schema must be an object",
            )),
        }
    }

    pub(crate) fn parse_at(raw: &Value, path: &str) -> Result<Self, SchemaError> {
        match raw {
            Value::String(name) => {
                if name.is_empty() {
                    return Err(SchemaError::shape(
                        SchemaKind::Type,
                        path,
                        "type name must not be empty",
                    ));
                }
                Ok(Self::Reference(name.clone()))
            }
            Value::Array(_) => RawAlternatives::parse(raw, path).map(Self::Alternatives),
            Value::Object(object) if object.contains_key("items") => {
                RawArray::parse(object, path).map(Self::Array)
            }
            Value::Object(object) => RawValue::parse(object, path).map(Self::Value),
            other => Err(SchemaError::shape(
                SchemaKind::Value,
                path,
                format!("expected an object, found {}", json_type(other)),
            )),
        }
    }

    /// Kind of node this raw schema resolves to.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        match self {
            Self::Reference(_) => SchemaKind::Type,
            Self::Alternatives(_) => SchemaKind::Alternatives,
            Self::Array(_) => SchemaKind::Array,
            Self::Value(_) => SchemaKind::Value,
        }
    }

    /// Every type name referenced in this tree, in depth-first order.
    ///
    /// Only references visible in the raw input are listed; references inside
    /// loaded type definitions are discovered while loading.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    #[must_use]
    pub fn has_references(&self) -> bool {
        match self {
            Self::Reference(_) => true,
            Self::Alternatives(alternatives) => alternatives
                .alternatives
                .iter()
                .any(|p| p.schema.has_references()),
            Self::Array(array) => array.items.has_references(),
            Self::Value(value) => {
                value.extend.iter().any(Self::has_references)
                    || value.properties.values().any(|p| p.schema.has_references())
            }
        }
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Reference(name) => names.push(name),
            Self::Alternatives(alternatives) => {
                for property in &alternatives.alternatives {
                    property.schema.collect_references(names);
                }
            }
            Self::Array(array) => array.items.collect_references(names),
            Self::Value(value) => {
                for parent in &value.extend {
                    parent.collect_references(names);
                }
                for property in value.properties.values() {
                    property.schema.collect_references(names);
                }
            }
        }
    }
}

impl RawAlternatives {
    fn parse(raw: &Value, path: &str) -> Result<Self, SchemaError> {
        let entries = match raw {
            Value::Array(entries) => entries,
            Value::Object(object) => {
                reject_unknown_keys(SchemaKind::Alternatives, object, ALTERNATIVES_KEYS, path)?;
                match object.get("alternatives") {
                    Some(Value::Array(entries)) => entries,
                    Some(_) => {
                        return Err(SchemaError::shape(
                            SchemaKind::Alternatives,
                            path,
                            "'alternatives' must be a sequence",
                        ));
                    }
                    None => {
                        return Err(SchemaError::shape(
                            SchemaKind::Alternatives,
                            path,
                            "missing required key 'alternatives'",
                        ));
                    }
                }
            }
            other => {
                return Err(SchemaError::shape(
                    SchemaKind::Alternatives,
                    path,
                    format!("expected a sequence, found {}", json_type(other)),
                ));
            }
        };

        let alternatives = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RawProperty::parse(entry, &format!("{path}[{index}]")))
            .collect::<Result<_, _>>()?;

        Ok(Self { alternatives })
    }
}

impl RawArray {
    fn parse(object: &Map<String, Value>, path: &str) -> Result<Self, SchemaError> {
        reject_unknown_keys(SchemaKind::Array, object, ARRAY_KEYS, path)?;

        let items = object.get("items").ok_or_else(|| {
            SchemaError::shape(SchemaKind::Array, path, "missing required key 'items'")
        })?;

        Ok(Self {
            items: Box::new(RawSchema::parse_at(items, &format!("{path}.items"))?),
            validation: parse_validation(SchemaKind::Array, object, path)?,
            meta: parse_meta(SchemaKind::Array, object.get("meta"), path)?,
        })
    }
}

impl RawValue {
    fn parse(object: &Map<String, Value>, path: &str) -> Result<Self, SchemaError> {
        let extend = match object.get("extend") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(parents)) => parents
                .iter()
                .enumerate()
                .map(|(index, parent)| {
                    RawSchema::parse_at(parent, &format!("{path}.extend[{index}]"))
                })
                .collect::<Result<_, _>>()?,
            Some(parent @ (Value::String(_) | Value::Object(_))) => {
                vec![RawSchema::parse_at(parent, &format!("{path}.extend[0]"))?]
            }
            Some(other) => {
                return Err(SchemaError::shape(
                    SchemaKind::Value,
                    path,
                    format!(
                        "'extend' must be a type name, a schema, or a sequence, found {}",
                        json_type(other)
                    ),
                ));
            }
        };

        let properties = match object.get("properties") {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Object(properties)) => properties
                .iter()
                .map(|(name, raw)| {
                    RawProperty::parse(raw, &format!("{path}.properties.{name}"))
                        .map(|property| (name.clone(), property))
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(SchemaError::shape(
                    SchemaKind::Value,
                    path,
                    format!("'properties' must be an object, found {}", json_type(other)),
                ));
            }
        };

        Ok(Self {
            extend,
            properties,
            validation: parse_validation(SchemaKind::Value, object, path)?,
            meta: parse_meta(SchemaKind::Value, object.get("meta"), path)?,
        })
    }
}

impl RawProperty {
    /// Bare values (a string, or an object without `schema`) are wrapped as
    /// `{"schema": raw}` before the property shape is checked.
    fn parse(raw: &Value, path: &str) -> Result<Self, SchemaError> {
        let object = match raw {
            Value::Object(object) if object.contains_key("schema") => object,
            bare => {
                return Ok(Self {
                    meta: None,
                    schema: Box::new(RawSchema::parse_at(bare, path)?),
                });
            }
        };

        reject_unknown_keys(SchemaKind::Property, object, PROPERTY_KEYS, path)?;
        let schema = object.get("schema").ok_or_else(|| {
            SchemaError::shape(SchemaKind::Property, path, "missing required key 'schema'")
        })?;

        Ok(Self {
            meta: parse_meta(SchemaKind::Property, object.get("meta"), path)?,
            schema: Box::new(RawSchema::parse_at(schema, &format!("{path}.schema"))?),
        })
    }
}

pub(crate) fn parse_meta(
    kind: SchemaKind,
    raw: Option<&Value>,
    path: &str,
) -> Result<Option<Meta>, SchemaError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(raw @ Value::Object(_)) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| SchemaError::shape(kind, path, format!("invalid 'meta': {e}"))),
        Some(other) => Err(SchemaError::shape(
            kind,
            path,
            format!("'meta' must be an object, found {}", json_type(other)),
        )),
    }
}

fn parse_validation(
    kind: SchemaKind,
    object: &Map<String, Value>,
    path: &str,
) -> Result<Option<Validation>, SchemaError> {
    match object.get("validation") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(rules)) => Ok(Some(Validation::from(rules.clone()))),
        Some(other) => Err(SchemaError::shape(
            kind,
            path,
            format!("'validation' must be an object, found {}", json_type(other)),
        )),
    }
}

fn reject_unknown_keys(
    kind: SchemaKind,
    object: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
) -> Result<(), SchemaError> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(SchemaError::shape(
            kind,
            path,
            format!("unexpected key '{key}'"),
        )),
        None => Ok(()),
    }
}

pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "object",
    }
}
