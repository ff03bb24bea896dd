//! Metadata and validation records attached to schema nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptive metadata for properties, types, and value nodes.
///
/// Unknown keys are kept in `extra` so that hosts can carry their own
/// annotations through resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Display metadata for enumeration values, aligned by position with
    /// `validation.values`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ValueMeta>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meta {
    #[must_use]
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Description, if present and non-empty.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Example value, if present and not `null`.
    #[must_use]
    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref().filter(|e| !e.is_null())
    }
}

/// Display metadata for one enumeration value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validation rule set of a node.
///
/// Kept as an open key/value record because inheritance merges it key by key:
/// `type` and `values` are the rules the emitters understand, anything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Validation(Map<String, Value>);

impl Validation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `{"type": <name>}`.
    #[must_use]
    pub fn of_type(name: &str) -> Self {
        let mut rules = Map::new();
        rules.insert("type".to_string(), Value::String(name.to_string()));
        Self(rules)
    }

    /// Raw `type` rule.
    #[must_use]
    pub fn type_rule(&self) -> Option<&Value> {
        self.0.get("type").filter(|v| !v.is_null())
    }

    /// `type` rule when it is a string.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_rule().and_then(Value::as_str)
    }

    /// Raw `values` rule.
    #[must_use]
    pub fn values(&self) -> Option<&Value> {
        self.0.get("values").filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Shallow merge: every key of `other` overwrites the same key here.
    pub fn extend(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Validation {
    fn from(rules: Map<String, Value>) -> Self {
        Self(rules)
    }
}
