//! Conversion error types.

use thiserror::Error;

/// Errors raised while emitting a resolved schema to a target dialect.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested target name is not a known converter.
    #[error("converter not implemented: {0}")]
    UnknownConverter(String),

    /// The target cannot express this kind of node or validator.
    #[error("{target} converter does not support {kind}: {reason}")]
    UnsupportedKind {
        target: &'static str,
        kind: String,
        reason: String,
    },

    /// Validation rules that cannot be emitted as written.
    #[error("invalid validation: {reason}")]
    InvalidValidation { reason: String },

    /// A definition key was registered twice with different content.
    #[error("conflicting definitions for '{key}'")]
    ConflictingDefinition { key: String },
}

impl ConvertError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidValidation {
            reason: reason.into(),
        }
    }
}
