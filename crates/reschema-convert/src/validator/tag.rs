//! Type tags for validators emitted from named types.
//!
//! A tag is a marker recorded on the validator itself, not a new primitive:
//! the five base primitives below can carry one, every other kind refuses.

use super::{Validator, ValidatorKind};
use crate::error::ConvertError;

/// Extension over the primitive builders that records a type name.
pub trait TypeTagged: Sized {
    /// Tag `self` with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedKind`] unless `self` is a string,
    /// number, boolean, object or array validator.
    fn typed(self, name: &str) -> Result<Self, ConvertError>;
}

impl TypeTagged for Validator {
    fn typed(mut self, name: &str) -> Result<Self, ConvertError> {
        match self.kind {
            ValidatorKind::String
            | ValidatorKind::Number { .. }
            | ValidatorKind::Boolean
            | ValidatorKind::Object { .. }
            | ValidatorKind::Array { .. } => {
                self.type_tag = Some(name.to_string());
                Ok(self)
            }
            ValidatorKind::Any | ValidatorKind::Alternatives { .. } | ValidatorKind::Link { .. } => {
                Err(ConvertError::UnsupportedKind {
                    target: "validator",
                    kind: self.kind.name().to_string(),
                    reason: format!("cannot carry type tag '{name}'"),
                })
            }
        }
    }
}
