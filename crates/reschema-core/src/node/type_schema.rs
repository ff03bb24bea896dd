use super::Schema;
use crate::meta::Meta;

/// Named, globally referenceable schema.
///
/// The name is slash-delimited (`billing/invoice`) and fixed once the loader
/// has produced the type's descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSchema {
    name: String,
    meta: Meta,
    schema: Box<Schema>,
}

impl TypeSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, meta: Meta, schema: Schema) -> Self {
        Self {
            name: name.into(),
            meta,
            schema: Box::new(schema),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with `/` replaced by `.`, used as the definition key on emission.
    #[must_use]
    pub fn dotted_name(&self) -> String {
        self.name.replace('/', ".")
    }

    #[must_use]
    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The schema this type names.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}
