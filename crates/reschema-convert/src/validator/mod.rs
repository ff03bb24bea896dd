//! Validation-DSL model.
//!
//! A [`Validator`] is an immutable builder chain in the style of schema
//! validation libraries: a primitive constructor (`string()`, `number()`,
//! `object()`, ...) followed by modifiers (`valid`, `description`, ...).
//! [`Validator::describe`] renders the chain as JSON.
//!
//! Validators produced for named types may carry a hidden type tag, see
//! [`TypeTagged`].

mod convert;
mod tag;

pub use convert::ValidatorConverter;
pub use tag::TypeTagged;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Primitive a validator is built on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValidatorKind {
    Any,
    String,
    Number {
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        integer: bool,
    },
    Boolean,
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        keys: Option<BTreeMap<String, Validator>>,
    },
    Array {
        items: Vec<Validator>,
    },
    Alternatives {
        matches: Vec<Validator>,
    },
    /// Reference to a definition registered elsewhere (`#<key>`).
    Link {
        reference: String,
    },
}

impl ValidatorKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Number { .. } => "number",
            Self::Boolean => "boolean",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Alternatives { .. } => "alternatives",
            Self::Link { .. } => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validator {
    #[serde(flatten)]
    kind: ValidatorKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    examples: Vec<Value>,

    #[serde(rename = "allow", skip_serializing_if = "Vec::is_empty")]
    allowed: Vec<Value>,

    /// Only `allowed` values pass.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    only: bool,

    #[serde(skip)]
    type_tag: Option<String>,
}

impl Validator {
    const fn new(kind: ValidatorKind) -> Self {
        Self {
            kind,
            description: None,
            label: None,
            examples: Vec::new(),
            allowed: Vec::new(),
            only: false,
            type_tag: None,
        }
    }

    // ── Constructors ───────────────────────────────────────────────

    #[must_use]
    pub const fn any() -> Self {
        Self::new(ValidatorKind::Any)
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::new(ValidatorKind::String)
    }

    #[must_use]
    pub const fn number() -> Self {
        Self::new(ValidatorKind::Number { integer: false })
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(ValidatorKind::Boolean)
    }

    #[must_use]
    pub const fn object() -> Self {
        Self::new(ValidatorKind::Object { keys: None })
    }

    #[must_use]
    pub const fn array() -> Self {
        Self::new(ValidatorKind::Array { items: Vec::new() })
    }

    /// Union; a value passes when any of `matches` accepts it.
    #[must_use]
    pub fn alternatives(matches: Vec<Self>) -> Self {
        Self::new(ValidatorKind::Alternatives { matches })
    }

    #[must_use]
    pub fn link(reference: impl Into<String>) -> Self {
        Self::new(ValidatorKind::Link {
            reference: reference.into(),
        })
    }

    // ── Modifiers ──────────────────────────────────────────────────

    /// Restrict a number validator to whole values. No effect on other kinds.
    #[must_use]
    pub fn integer(mut self) -> Self {
        if let ValidatorKind::Number { integer } = &mut self.kind {
            *integer = true;
        }
        self
    }

    /// Add object keys. No effect on other kinds.
    #[must_use]
    pub fn keys(mut self, keys: BTreeMap<String, Self>) -> Self {
        if let ValidatorKind::Object { keys: slot } = &mut self.kind {
            slot.get_or_insert_with(BTreeMap::new).extend(keys);
        }
        self
    }

    /// Add an item validator. No effect on other kinds.
    #[must_use]
    pub fn items(mut self, item: Self) -> Self {
        if let ValidatorKind::Array { items } = &mut self.kind {
            items.push(item);
        }
        self
    }

    /// Accept exactly `values`.
    #[must_use]
    pub fn valid(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed.extend(values);
        self.only = true;
        self
    }

    /// Accept `values` in addition to whatever the base kind accepts.
    #[must_use]
    pub fn allow(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed.extend(values);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn example(mut self, example: Value) -> Self {
        self.examples.push(example);
        self
    }

    // ── Accessors ──────────────────────────────────────────────────

    #[must_use]
    pub const fn kind(&self) -> &ValidatorKind {
        &self.kind
    }

    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn examples(&self) -> &[Value] {
        &self.examples
    }

    #[must_use]
    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }

    #[must_use]
    pub const fn is_only(&self) -> bool {
        self.only
    }

    /// Name of the type this validator was emitted for, in embed-type mode.
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// JSON description of the chain. The type tag is not included.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if an example or allowed value cannot
    /// be represented as JSON.
    pub fn describe(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn describes_builder_chain() {
        let validator = Validator::object().keys(BTreeMap::from([
            ("age".to_string(), Validator::number().integer().description("years")),
            (
                "kind".to_string(),
                Validator::string().valid([json!("a"), json!("b")]),
            ),
        ]));

        assert_eq!(
            validator.describe().unwrap(),
            json!({
                "type": "object",
                "keys": {
                    "age": {"type": "number", "integer": true, "description": "years"},
                    "kind": {"type": "string", "allow": ["a", "b"], "only": true}
                }
            })
        );
    }

    #[test]
    fn allow_does_not_restrict() {
        let validator = Validator::any().allow([json!(null)]);
        assert!(!validator.is_only());
        assert_eq!(validator.describe().unwrap(), json!({"type": "any", "allow": [null]}));
    }

    #[test]
    fn describe_keeps_examples_and_label() {
        let validator = Validator::string()
            .label("code")
            .example(json!("ab-12"))
            .example(json!("cd-34"));
        assert_eq!(
            validator.describe().unwrap(),
            json!({"type": "string", "label": "code", "examples": ["ab-12", "cd-34"]})
        );
    }

    #[test]
    fn modifiers_ignore_other_kinds() {
        assert_eq!(Validator::string().integer(), Validator::string());
        assert_eq!(
            Validator::string().items(Validator::any()),
            Validator::string()
        );
    }

    #[test]
    fn link_and_alternatives() {
        let validator = Validator::alternatives(vec![
            Validator::link("#common.id"),
            Validator::array().items(Validator::boolean()),
        ])
        .label("either");
        assert_eq!(
            validator.describe().unwrap(),
            json!({
                "type": "alternatives",
                "matches": [
                    {"type": "link", "reference": "#common.id"},
                    {"type": "array", "items": [{"type": "boolean"}]}
                ],
                "label": "either"
            })
        );
    }
}
