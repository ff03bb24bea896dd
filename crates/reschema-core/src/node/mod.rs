//! Resolved schema graph.
//!
//! Five node kinds form one sum type. Every node is immutable once built:
//! the resolver constructs children first and hands them to the parent's
//! constructor, which computes any derived fields (merged properties and
//! validation for value nodes) exactly once.
//!
//! Type nodes are reference counted: every reference to the same named type
//! within one resolver points at a single [`TypeSchema`].

mod alternatives;
mod array;
mod property;
mod type_schema;
mod value;

pub use alternatives::AlternativesSchema;
pub use array::ArraySchema;
pub use property::PropertySchema;
pub use type_schema::TypeSchema;
pub use value::ValueSchema;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::meta::{Meta, Validation};

/// Property name → resolved property. Entries are shared with the parents a
/// value node inherits them from.
pub type Properties = BTreeMap<String, Arc<PropertySchema>>;

/// Discriminator of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Value,
    Array,
    Alternatives,
    Property,
    Type,
}

impl SchemaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Array => "array",
            Self::Alternatives => "alternatives",
            Self::Property => "property",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Value(ValueSchema),
    Array(ArraySchema),
    Alternatives(AlternativesSchema),
    Property(PropertySchema),
    Type(Arc<TypeSchema>),
}

impl Schema {
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        match self {
            Self::Value(_) => SchemaKind::Value,
            Self::Array(_) => SchemaKind::Array,
            Self::Alternatives(_) => SchemaKind::Alternatives,
            Self::Property(_) => SchemaKind::Property,
            Self::Type(_) => SchemaKind::Type,
        }
    }

    /// Effective properties of value-like nodes.
    ///
    /// Type nodes answer for the value they name; array, alternatives and
    /// property nodes have none.
    #[must_use]
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Self::Value(value) => Some(value.properties()),
            Self::Type(ty) => ty.schema().properties(),
            Self::Array(_) | Self::Alternatives(_) | Self::Property(_) => None,
        }
    }

    /// Effective validation, if this node defines any.
    #[must_use]
    pub fn validation(&self) -> Option<&Validation> {
        match self {
            Self::Value(value) => value.validation(),
            Self::Type(ty) => ty.schema().validation(),
            Self::Array(array) => array.validation(),
            Self::Alternatives(_) | Self::Property(_) => None,
        }
    }

    #[must_use]
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Self::Value(value) => value.meta(),
            Self::Array(array) => array.meta(),
            Self::Property(property) => property.meta(),
            Self::Type(ty) => Some(ty.meta()),
            Self::Alternatives(_) => None,
        }
    }

    /// Name of a type node.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Type(ty) => Some(ty.name()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&ValueSchema> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&ArraySchema> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_alternatives(&self) -> Option<&AlternativesSchema> {
        match self {
            Self::Alternatives(alternatives) => Some(alternatives),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&PropertySchema> {
        match self {
            Self::Property(property) => Some(property),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&TypeSchema> {
        self.shared_type().map(Arc::as_ref)
    }

    /// The shared handle of a type node.
    #[must_use]
    pub const fn shared_type(&self) -> Option<&Arc<TypeSchema>> {
        match self {
            Self::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

impl From<ValueSchema> for Schema {
    fn from(value: ValueSchema) -> Self {
        Self::Value(value)
    }
}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        Self::Array(array)
    }
}

impl From<AlternativesSchema> for Schema {
    fn from(alternatives: AlternativesSchema) -> Self {
        Self::Alternatives(alternatives)
    }
}

impl From<PropertySchema> for Schema {
    fn from(property: PropertySchema) -> Self {
        Self::Property(property)
    }
}

impl From<TypeSchema> for Schema {
    fn from(ty: TypeSchema) -> Self {
        Self::Type(Arc::new(ty))
    }
}

impl From<Arc<TypeSchema>> for Schema {
    fn from(ty: Arc<TypeSchema>) -> Self {
        Self::Type(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SchemaKind::Value, "value")]
    #[case(SchemaKind::Array, "array")]
    #[case(SchemaKind::Alternatives, "alternatives")]
    #[case(SchemaKind::Property, "property")]
    #[case(SchemaKind::Type, "type")]
    fn kind_names(#[case] kind: SchemaKind, #[case] name: &str) {
        assert_eq!(kind.to_string(), name);
        assert_eq!(serde_json::to_value(kind).unwrap(), name);
    }

    #[test]
    fn type_node_exposes_inner_value() {
        let inner = ValueSchema::builder()
            .validation(Validation::of_type("integer"))
            .build();
        let ty = Schema::from(TypeSchema::new("num/int", Meta::default(), inner.into()));

        assert_eq!(ty.kind(), SchemaKind::Type);
        assert_eq!(ty.name(), Some("num/int"));
        assert_eq!(ty.validation().and_then(Validation::type_name), Some("integer"));
        assert!(ty.properties().is_some_and(BTreeMap::is_empty));
    }

    #[test]
    fn array_has_no_properties() {
        let items = ValueSchema::builder().build();
        let array = Schema::from(ArraySchema::new(items.into(), None, None));
        assert!(array.properties().is_none());
        assert!(array.validation().is_none());
        assert!(array.as_array().is_some());
        assert!(array.as_value().is_none());
    }
}
