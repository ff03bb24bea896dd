use std::collections::BTreeMap;

use reschema_core::{Meta, PropertySchema, Schema, TypeSchema, Validation, ValueSchema};
use serde_json::Value;

use super::{TypeTagged, Validator};
use crate::context::ConversionContext;
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::rules::{declared_type, enumeration};
use crate::traits::Converter;

/// Emits [`Validator`] chains.
///
/// Named types are registered in the context under their dotted name and
/// referenced with [`Validator::link`] (`#<dotted.name>`), unless
/// `deref` is set.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConverter {
    options: ConvertOptions,
}

impl ValidatorConverter {
    #[must_use]
    pub const fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    fn primitive(validation: Option<&Validation>) -> Result<Validator, ConvertError> {
        Ok(match declared_type(validation)? {
            Some("string") => Validator::string(),
            Some("number") => Validator::number(),
            Some("integer") => Validator::number().integer(),
            Some("boolean") => Validator::boolean(),
            _ => Validator::any(),
        })
    }

    fn value(
        &self,
        value: &ValueSchema,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError> {
        if !value.properties().is_empty() {
            let mut keys = BTreeMap::new();
            for (name, property) in value.properties() {
                keys.insert(name.clone(), self.property(property, context)?);
            }
            return Ok(Validator::object().keys(keys));
        }

        let Some(enumeration) = enumeration(value)? else {
            return Self::primitive(value.validation());
        };

        match enumeration.titles {
            Some(titles) => {
                let matches = enumeration
                    .values
                    .iter()
                    .zip(titles)
                    .map(|(literal, meta)| {
                        let choice = Self::primitive(value.validation())?.valid([literal.clone()]);
                        Ok(match &meta.name {
                            Some(name) => choice.label(name.as_str()),
                            None => choice,
                        })
                    })
                    .collect::<Result<Vec<_>, ConvertError>>()?;
                Ok(Validator::alternatives(matches))
            }
            None => Ok(Self::primitive(value.validation())?
                .valid(enumeration.values.iter().cloned())),
        }
    }

    fn property(
        &self,
        property: &PropertySchema,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError> {
        let out = self.convert(property.schema(), context)?;
        Ok(match property.meta().and_then(Meta::description) {
            Some(description) => out.description(description),
            None => out,
        })
    }

    fn named(
        &self,
        ty: &TypeSchema,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError> {
        let mut out = self.convert(ty.schema(), context)?;
        if self.options.embed_types {
            out = out.typed(ty.name())?;
        }
        if let Some(description) = ty.meta().description() {
            out = out.description(description);
        }
        if let Some(example) = ty.meta().example() {
            out = out.example(example.clone());
        }

        if self.options.deref {
            return Ok(out);
        }

        let key = ty.dotted_name();
        let link = Validator::link(format!("#{key}"));
        context.register(key, out)?;
        Ok(link)
    }
}

impl Converter for ValidatorConverter {
    type Output = Validator;

    fn name(&self) -> &'static str {
        "validator"
    }

    fn convert(
        &self,
        schema: &Schema,
        context: &mut ConversionContext<Validator>,
    ) -> Result<Validator, ConvertError> {
        match schema {
            Schema::Value(value) => self.value(value, context),
            Schema::Array(array) => Ok(Validator::array().items(self.convert(array.items(), context)?)),
            Schema::Alternatives(alternatives) => {
                let matches = alternatives
                    .alternatives()
                    .iter()
                    .map(|alternative| self.property(alternative, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Validator::alternatives(matches))
            }
            Schema::Property(property) => self.property(property, context),
            Schema::Type(ty) => self.named(ty, context),
        }
    }
}
