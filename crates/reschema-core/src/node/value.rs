//! Value nodes and the inheritance merge.
//!
//! A value node inherits from its `extend` parents:
//!
//! - properties: every parent's properties are merged in list order (a later
//!   parent overwrites an earlier one on the same key), then the node's own
//!   properties are merged on top and always win;
//! - validation: the validation of the FIRST parent that defines one is
//!   cloned and the node's own rules are merged over it key by key. Later
//!   parents never contribute validation.

use std::sync::Arc;

use super::{Properties, PropertySchema, Schema};
use crate::meta::{Meta, Validation};

/// Object or scalar schema, possibly inheriting from parents.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSchema {
    extend: Vec<Arc<Schema>>,
    own_properties: Properties,
    own_validation: Option<Validation>,
    meta: Option<Meta>,
    properties: Properties,
    validation: Option<Validation>,
}

impl ValueSchema {
    /// Build a value node from resolved parents and own declarations.
    ///
    /// The effective properties and validation are computed here, once.
    #[must_use]
    pub fn new(
        extend: Vec<Arc<Schema>>,
        own_properties: Properties,
        own_validation: Option<Validation>,
        meta: Option<Meta>,
    ) -> Self {
        let properties = merge_properties(&extend, &own_properties);
        let validation = merge_validation(&extend, own_validation.as_ref());
        Self {
            extend,
            own_properties,
            own_validation,
            meta,
            properties,
            validation,
        }
    }

    #[must_use]
    pub fn builder() -> ValueSchemaBuilder {
        ValueSchemaBuilder::default()
    }

    /// Effective properties after inheritance.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Effective validation after inheritance.
    #[must_use]
    pub const fn validation(&self) -> Option<&Validation> {
        self.validation.as_ref()
    }

    /// Parents in declaration order.
    #[must_use]
    pub fn extend(&self) -> &[Arc<Schema>] {
        &self.extend
    }

    /// Properties declared on this node only.
    #[must_use]
    pub const fn own_properties(&self) -> &Properties {
        &self.own_properties
    }

    /// Validation declared on this node only.
    #[must_use]
    pub const fn own_validation(&self) -> Option<&Validation> {
        self.own_validation.as_ref()
    }

    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}

/// Incremental constructor for value nodes built by hand.
#[derive(Debug, Default)]
pub struct ValueSchemaBuilder {
    extend: Vec<Arc<Schema>>,
    properties: Properties,
    validation: Option<Validation>,
    meta: Option<Meta>,
}

impl ValueSchemaBuilder {
    #[must_use]
    pub fn extend(mut self, parent: impl Into<Arc<Schema>>) -> Self {
        self.extend.push(parent.into());
        self
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, property: PropertySchema) -> Self {
        self.properties.insert(name.into(), Arc::new(property));
        self
    }

    #[must_use]
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    #[must_use]
    pub fn build(self) -> ValueSchema {
        ValueSchema::new(self.extend, self.properties, self.validation, self.meta)
    }
}

fn merge_properties(extend: &[Arc<Schema>], own: &Properties) -> Properties {
    let mut merged = Properties::new();
    for parent in extend {
        if let Some(inherited) = parent.properties() {
            merged.extend(
                inherited
                    .iter()
                    .map(|(name, property)| (name.clone(), Arc::clone(property))),
            );
        }
    }
    merged.extend(
        own.iter()
            .map(|(name, property)| (name.clone(), Arc::clone(property))),
    );
    merged
}

fn merge_validation(extend: &[Arc<Schema>], own: Option<&Validation>) -> Option<Validation> {
    let inherited = extend.iter().find_map(|parent| parent.validation()).cloned();
    match (inherited, own) {
        (Some(mut merged), Some(own)) => {
            merged.extend(own);
            Some(merged)
        }
        (Some(inherited), None) => Some(inherited),
        (None, own) => own.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TypeSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn string_value() -> Schema {
        ValueSchema::builder()
            .validation(Validation::of_type("string"))
            .build()
            .into()
    }

    fn integer_value() -> Schema {
        ValueSchema::builder()
            .validation(Validation::of_type("integer"))
            .build()
            .into()
    }

    fn described(description: &str, schema: Schema) -> PropertySchema {
        PropertySchema::new(Some(Meta::with_description(description)), schema)
    }

    fn description_of(value: &ValueSchema, name: &str) -> Option<String> {
        value.properties()[name]
            .meta()
            .and_then(Meta::description)
            .map(str::to_string)
    }

    #[test]
    fn own_property_wins_over_every_parent() {
        let a = ValueSchema::builder()
            .property("p", described("from a", string_value()))
            .build();
        let b = ValueSchema::builder()
            .property("p", described("from b", string_value()))
            .build();
        let node = ValueSchema::builder()
            .extend(Schema::from(a))
            .extend(Schema::from(b))
            .property("p", described("own", integer_value()))
            .build();

        assert_eq!(description_of(&node, "p").as_deref(), Some("own"));
    }

    #[test]
    fn last_parent_wins_without_own_declaration() {
        let a = ValueSchema::builder()
            .property("p", described("from a", string_value()))
            .property("only_a", described("a", string_value()))
            .build();
        let b = ValueSchema::builder()
            .property("p", described("from b", string_value()))
            .build();
        let node = ValueSchema::builder()
            .extend(Schema::from(a))
            .extend(Schema::from(b))
            .build();

        assert_eq!(description_of(&node, "p").as_deref(), Some("from b"));
        assert_eq!(description_of(&node, "only_a").as_deref(), Some("a"));
        assert!(node.own_properties().is_empty());
    }

    #[test]
    fn validation_comes_from_first_defining_parent_only() {
        let a = ValueSchema::builder()
            .validation(
                serde_json::from_value(json!({"type": "number", "minimum": 0})).unwrap(),
            )
            .build();
        let b = ValueSchema::builder()
            .validation(serde_json::from_value(json!({"maximum": 10})).unwrap())
            .build();
        let node = ValueSchema::builder()
            .extend(Schema::from(ValueSchema::builder().build()))
            .extend(Schema::from(a))
            .extend(Schema::from(b))
            .validation(Validation::of_type("integer"))
            .build();

        assert_eq!(
            serde_json::to_value(node.validation().unwrap()).unwrap(),
            json!({"type": "integer", "minimum": 0})
        );
    }

    #[test]
    fn own_validation_passes_through_without_parents() {
        let node = ValueSchema::builder()
            .extend(Schema::from(ValueSchema::builder().build()))
            .validation(Validation::of_type("boolean"))
            .build();
        assert_eq!(node.validation(), Some(&Validation::of_type("boolean")));
        assert_eq!(node.own_validation(), Some(&Validation::of_type("boolean")));
    }

    #[test]
    fn inherited_validation_is_a_copy() {
        let parent = Arc::new(Schema::from(
            ValueSchema::builder()
                .validation(Validation::of_type("number"))
                .build(),
        ));
        let child = ValueSchema::builder()
            .extend(Arc::clone(&parent))
            .validation(Validation::of_type("integer"))
            .build();

        assert_eq!(child.validation().and_then(Validation::type_name), Some("integer"));
        assert_eq!(parent.validation().and_then(Validation::type_name), Some("number"));
    }

    #[test]
    fn type_parent_contributes_its_value() {
        let named = TypeSchema::new(
            "base/entity",
            Meta::default(),
            ValueSchema::builder()
                .property("id", described("identifier", string_value()))
                .validation(Validation::of_type("object"))
                .build()
                .into(),
        );
        let node = ValueSchema::builder().extend(Schema::from(named)).build();

        assert_eq!(description_of(&node, "id").as_deref(), Some("identifier"));
        assert_eq!(node.validation().and_then(Validation::type_name), Some("object"));
        assert_eq!(node.extend().len(), 1);
    }
}
