//! Validation rules understood by every emitter.

use reschema_core::{Validation, ValueMeta, ValueSchema};
use serde_json::Value;

use crate::error::ConvertError;

/// Primitive names accepted in a `type` rule.
pub(crate) const KNOWN_TYPES: &[&str] = &[
    "string", "number", "integer", "boolean", "null", "object", "array",
];

/// The `type` rule, when it names a known primitive.
///
/// Unknown names are logged and treated as unconstrained.
pub(crate) fn declared_type(validation: Option<&Validation>) -> Result<Option<&str>, ConvertError> {
    let Some(rule) = validation.and_then(Validation::type_rule) else {
        return Ok(None);
    };
    match rule {
        Value::String(name) if KNOWN_TYPES.contains(&name.as_str()) => Ok(Some(name)),
        Value::String(name) => {
            tracing::warn!(type_name = %name, "unknown validation type, emitting unconstrained schema");
            Ok(None)
        }
        other => Err(ConvertError::invalid(format!(
            "'type' must be a string, found {other}"
        ))),
    }
}

/// Enumerated values of a value node, with their display metadata when the
/// node carries one entry per value.
pub(crate) struct Enumeration<'a> {
    pub values: &'a [Value],
    pub titles: Option<&'a [ValueMeta]>,
}

pub(crate) fn enumeration(value: &ValueSchema) -> Result<Option<Enumeration<'_>>, ConvertError> {
    let Some(raw) = value.validation().and_then(Validation::values) else {
        return Ok(None);
    };
    let values = raw
        .as_array()
        .ok_or_else(|| ConvertError::invalid("'values' must be a sequence"))?;

    let titles = value.meta().and_then(|meta| meta.values.as_deref());
    match titles {
        Some(titles) if titles.len() != values.len() => {
            return Err(ConvertError::invalid(format!(
                "meta.values has {} entries but validation.values has {}",
                titles.len(),
                values.len()
            )));
        }
        _ => {}
    }

    Ok(Some(Enumeration { values, titles }))
}

/// Primitive name of a literal value.
pub(crate) fn literal_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Number(n) if n.is_f64() => Some("number"),
        Value::Number(_) => Some("integer"),
        Value::Bool(_) => Some("boolean"),
        Value::Null => Some("null"),
        Value::Array(_) | Value::Object(_) => None,
    }
}
