use super::Schema;
use crate::meta::Meta;

/// Metadata-bearing wrapper around one child schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    meta: Option<Meta>,
    schema: Box<Schema>,
}

impl PropertySchema {
    #[must_use]
    pub fn new(meta: Option<Meta>, schema: Schema) -> Self {
        Self {
            meta,
            schema: Box::new(schema),
        }
    }

    /// Effective metadata.
    ///
    /// A property without its own `meta` reports the meta of the named type
    /// it wraps, so a reference picks up the type's description.
    #[must_use]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta
            .as_ref()
            .or_else(|| self.schema.as_type().map(super::TypeSchema::meta))
    }

    /// Metadata declared on the property itself.
    #[must_use]
    pub const fn own_meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}
