//! Conversion by target name.

use std::fmt;
use std::str::FromStr;

use reschema_core::Schema;
use serde::Serialize;
use serde_json::Value;

use crate::context::ConversionContext;
use crate::error::ConvertError;
use crate::json_schema::JsonSchemaConverter;
use crate::options::ConvertOptions;
use crate::traits::Converter;
use crate::validator::{Validator, ValidatorConverter};

/// Supported output dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    JsonSchema,
    Validator,
}

impl Target {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JsonSchema => "jsonschema",
            Self::Validator => "validator",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ConvertError;

    /// Case-insensitive. `joi` is accepted as an alias for the validator DSL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonschema" => Ok(Self::JsonSchema),
            "validator" | "joi" => Ok(Self::Validator),
            _ => Err(ConvertError::UnknownConverter(s.to_string())),
        }
    }
}

/// Output of a converter picked at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Converted {
    JsonSchema(Value),
    Validator(Validator),
}

impl Converted {
    #[must_use]
    pub const fn target(&self) -> Target {
        match self {
            Self::JsonSchema(_) => Target::JsonSchema,
            Self::Validator(_) => Target::Validator,
        }
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::JsonSchema(json) => Some(json),
            Self::Validator(_) => None,
        }
    }

    #[must_use]
    pub const fn as_validator(&self) -> Option<&Validator> {
        match self {
            Self::Validator(validator) => Some(validator),
            Self::JsonSchema(_) => None,
        }
    }
}

/// Converter chosen by [`Target`].
#[derive(Debug, Clone)]
pub enum AnyConverter {
    JsonSchema(JsonSchemaConverter),
    Validator(ValidatorConverter),
}

impl AnyConverter {
    #[must_use]
    pub const fn new(target: Target, options: ConvertOptions) -> Self {
        match target {
            Target::JsonSchema => Self::JsonSchema(JsonSchemaConverter::new(options)),
            Target::Validator => Self::Validator(ValidatorConverter::new(options)),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownConverter`] for an unknown name.
    pub fn from_name(name: &str, options: ConvertOptions) -> Result<Self, ConvertError> {
        Ok(Self::new(name.parse()?, options))
    }
}

impl Converter for AnyConverter {
    type Output = Converted;

    fn name(&self) -> &'static str {
        match self {
            Self::JsonSchema(converter) => converter.name(),
            Self::Validator(converter) => converter.name(),
        }
    }

    fn convert(
        &self,
        schema: &Schema,
        context: &mut ConversionContext<Converted>,
    ) -> Result<Converted, ConvertError> {
        match self {
            Self::JsonSchema(converter) => run(converter, schema, context, Converted::JsonSchema),
            Self::Validator(converter) => run(converter, schema, context, Converted::Validator),
        }
    }
}

/// Convert with a typed context, then merge its definitions into `context`.
fn run<C: Converter>(
    converter: &C,
    schema: &Schema,
    context: &mut ConversionContext<Converted>,
    wrap: fn(C::Output) -> Converted,
) -> Result<Converted, ConvertError> {
    let mut local = ConversionContext::new();
    let out = converter.convert(schema, &mut local)?;
    local.merge_into(context, wrap)?;
    Ok(wrap(out))
}

/// Conversion entry points on resolved schemas.
pub trait SchemaExt {
    /// Convert to the dialect named `target` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownConverter`] for an unknown target, or
    /// any error of the selected converter.
    fn to(
        &self,
        target: &str,
        options: &ConvertOptions,
        context: &mut ConversionContext<Converted>,
    ) -> Result<Converted, ConvertError>;

    /// # Errors
    ///
    /// See [`JsonSchemaConverter`].
    fn to_json_schema(
        &self,
        options: &ConvertOptions,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError>;

    /// # Errors
    ///
    /// See [`ValidatorConverter`].
    fn to_validator(
        &self,
        options: &ConvertOptions,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError>;
}

impl SchemaExt for Schema {
    fn to(
        &self,
        target: &str,
        options: &ConvertOptions,
        context: &mut ConversionContext<Converted>,
    ) -> Result<Converted, ConvertError> {
        let converter = AnyConverter::from_name(target, *options)?;
        tracing::debug!(converter = converter.name(), kind = %self.kind(), "converting schema");
        converter.convert(self, context)
    }

    fn to_json_schema(
        &self,
        options: &ConvertOptions,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError> {
        JsonSchemaConverter::new(*options).convert(self, context)
    }

    fn to_validator(
        &self,
        options: &ConvertOptions,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError> {
        ValidatorConverter::new(*options).convert(self, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("JsonSchema", Target::JsonSchema)]
    #[case("JSONSCHEMA", Target::JsonSchema)]
    #[case("jsonschema", Target::JsonSchema)]
    #[case("Joi", Target::Validator)]
    #[case("validator", Target::Validator)]
    fn target_names_are_case_insensitive(#[case] name: &str, #[case] expected: Target) {
        assert_eq!(name.parse::<Target>().unwrap(), expected);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let err = "nope".parse::<Target>().unwrap_err();
        assert_eq!(err.to_string(), "converter not implemented: nope");
    }
}
