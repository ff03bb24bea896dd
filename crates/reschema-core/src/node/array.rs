use super::Schema;
use crate::meta::{Meta, Validation};

/// Homogeneous sequence schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    items: Box<Schema>,
    validation: Option<Validation>,
    meta: Option<Meta>,
}

impl ArraySchema {
    #[must_use]
    pub fn new(items: Schema, validation: Option<Validation>, meta: Option<Meta>) -> Self {
        Self {
            items: Box::new(items),
            validation,
            meta,
        }
    }

    /// Schema every element must satisfy.
    #[must_use]
    pub const fn items(&self) -> &Schema {
        &self.items
    }

    #[must_use]
    pub const fn validation(&self) -> Option<&Validation> {
        self.validation.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}
