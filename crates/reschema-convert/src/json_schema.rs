//! JSON-Schema emitter.
//!
//! | node          | emitted                                                  |
//! |---------------|----------------------------------------------------------|
//! | value (props) | `{"type": "object", "properties": {...}}`                |
//! | value (enum)  | `{"enum": [...]}` or `{"anyOf": [{"enum": [v], "title"}]}` |
//! | value         | `{"type": <validation.type>}`                            |
//! | array         | `{"type": "array", "items": ...}`                        |
//! | alternatives  | `{"anyOf": [...]}`                                       |
//! | property      | inner schema plus `description`                          |
//! | type          | `{"$ref": "#/definitions/<dotted.name>"}`, or inline     |
//!
//! Named types are registered in the [`ConversionContext`]; combine the root
//! and the context with [`document`] to get a self-contained schema.

use reschema_core::{Meta, PropertySchema, Schema, TypeSchema, ValueSchema};
use serde_json::{Map, Value, json};

use crate::context::ConversionContext;
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::rules::{declared_type, enumeration, literal_type};
use crate::traits::Converter;

/// Emits JSON-Schema documents.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaConverter {
    options: ConvertOptions,
}

impl JsonSchemaConverter {
    #[must_use]
    pub const fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn value(
        &self,
        value: &ValueSchema,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError> {
        let mut out = Map::new();

        if !value.properties().is_empty() {
            let mut properties = Map::new();
            for (name, property) in value.properties() {
                properties.insert(name.clone(), self.property(property, context)?);
            }
            out.insert("type".into(), json!("object"));
            out.insert("properties".into(), Value::Object(properties));
            return Ok(Value::Object(out));
        }

        let type_name = declared_type(value.validation())?;
        if let Some(type_name) = type_name {
            out.insert("type".into(), json!(type_name));
        }

        if let Some(enumeration) = enumeration(value)? {
            match enumeration.titles {
                Some(titles) => {
                    let any_of = enumeration
                        .values
                        .iter()
                        .zip(titles)
                        .map(|(literal, meta)| {
                            let mut choice = Map::new();
                            if let Some(ty) = type_name.or_else(|| literal_type(literal)) {
                                choice.insert("type".into(), json!(ty));
                            }
                            choice.insert("enum".into(), json!([literal]));
                            if let Some(title) = &meta.name {
                                choice.insert("title".into(), json!(title));
                            }
                            Value::Object(choice)
                        })
                        .collect();
                    out.insert("anyOf".into(), Value::Array(any_of));
                }
                None => {
                    out.insert("enum".into(), Value::Array(enumeration.values.to_vec()));
                }
            }
        }

        Ok(Value::Object(out))
    }

    fn property(
        &self,
        property: &PropertySchema,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError> {
        let mut out = self.convert(property.schema(), context)?;
        if let Some(description) = property.meta().and_then(Meta::description) {
            annotate(&mut out, "description", json!(description));
        }
        Ok(out)
    }

    fn named(
        &self,
        ty: &TypeSchema,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError> {
        let mut out = self.convert(ty.schema(), context)?;
        if let Some(description) = ty.meta().description() {
            annotate(&mut out, "description", json!(description));
        }
        if let Some(example) = ty.meta().example() {
            annotate(&mut out, "example", example.clone());
        }

        if self.options.deref {
            return Ok(out);
        }

        let key = ty.dotted_name();
        let reference = json!({"$ref": format!("#/definitions/{key}")});
        context.register(key, out)?;
        Ok(reference)
    }
}

impl Converter for JsonSchemaConverter {
    type Output = Value;

    fn name(&self) -> &'static str {
        "jsonschema"
    }

    fn convert(
        &self,
        schema: &Schema,
        context: &mut ConversionContext<Value>,
    ) -> Result<Value, ConvertError> {
        match schema {
            Schema::Value(value) => self.value(value, context),
            Schema::Array(array) => Ok(json!({
                "type": "array",
                "items": self.convert(array.items(), context)?,
            })),
            Schema::Alternatives(alternatives) => {
                let any_of = alternatives
                    .alternatives()
                    .iter()
                    .map(|alternative| self.property(alternative, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(json!({"anyOf": any_of}))
            }
            Schema::Property(property) => self.property(property, context),
            Schema::Type(ty) => self.named(ty, context),
        }
    }
}

fn annotate(schema: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = schema {
        map.insert(key.to_string(), value);
    }
}

/// Self-contained document: `root` with the collected definitions attached.
///
/// The context is consumed; an empty context leaves `root` unchanged.
#[must_use]
pub fn document(root: Value, context: ConversionContext<Value>) -> Value {
    if context.is_empty() {
        return root;
    }
    let definitions: Map<String, Value> = context.definitions.into_iter().collect();
    match root {
        Value::Object(mut map) => {
            map.insert("definitions".into(), Value::Object(definitions));
            Value::Object(map)
        }
        other => json!({"allOf": [other], "definitions": definitions}),
    }
}
