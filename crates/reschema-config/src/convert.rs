//! Emission defaults.

use reschema_convert::{ConvertOptions, Target};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_target() -> String {
    Target::JsonSchema.as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Converter name, e.g. `jsonschema` or `joi`.
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default)]
    pub deref: bool,

    #[serde(default)]
    pub embed_types: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            deref: false,
            embed_types: false,
        }
    }
}

impl ConvertConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `target` names no converter.
    pub fn target(&self) -> Result<Target, ConfigError> {
        self.target.parse().map_err(|e| ConfigError::InvalidValue {
            field: "convert.target".to_string(),
            reason: format!("{e}"),
        })
    }

    #[must_use]
    pub const fn options(&self) -> ConvertOptions {
        ConvertOptions {
            deref: self.deref,
            embed_types: self.embed_types,
        }
    }
}
