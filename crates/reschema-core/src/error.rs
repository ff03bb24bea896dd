//! Error types for schema construction and resolution.
//!
//! Construction can fail in three places: synchronously while the raw input is
//! shape-checked, before any loading starts when no loader is available for a
//! type reference, and asynchronously while named types are fetched. Any
//! failure aborts the whole `create` call; no partially resolved graph is ever
//! returned.

use thiserror::Error;

use crate::node::SchemaKind;

/// Errors raised while building a [`Schema`](crate::Schema) graph.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Raw input does not match the minimal shape of the node kind it
    /// dispatched to.
    #[error("invalid {kind} schema at {path}: {message}")]
    Shape {
        /// Node kind the raw input was dispatched to.
        kind: SchemaKind,
        /// Dotted path of the offending raw node (`$` is the root).
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// A type reference was encountered but no loader was configured.
    #[error("missing loader: cannot resolve type reference '{name}'")]
    MissingLoader {
        /// The first reference found without a loader.
        name: String,
    },

    /// The loader failed to produce a descriptor for a named type.
    #[error("failed to load type '{name}': {source}")]
    Resolution {
        /// Requested type name.
        name: String,
        /// Error reported by the loader.
        #[source]
        source: anyhow::Error,
    },

    /// The loader returned a descriptor that cannot be used.
    #[error("malformed type descriptor for '{name}': {reason}")]
    MalformedDescriptor { name: String, reason: String },

    /// A named type references itself, directly or through other types.
    #[error("cyclic type reference: {}", chain.join(" -> "))]
    CyclicReference {
        /// Type names from the outermost reference to the repeated one.
        chain: Vec<String>,
    },
}

impl SchemaError {
    pub(crate) fn shape(kind: SchemaKind, path: &str, message: impl Into<String>) -> Self {
        Self::Shape {
            kind,
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// True for errors raised before any asynchronous work starts.
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(self, Self::Shape { .. } | Self::MissingLoader { .. })
    }
}
