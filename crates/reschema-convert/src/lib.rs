//! # reschema-convert
//!
//! Emitters from a resolved [`reschema_core::Schema`] graph to target
//! dialects:
//!
//! - [`JsonSchemaConverter`]: JSON-Schema documents with named types collected
//!   under `definitions`;
//! - [`ValidatorConverter`]: [`Validator`] builder chains for a validation
//!   DSL, optionally tagged with the name of the type they were emitted for.
//!
//! Both implement [`Converter`]. [`SchemaExt::to`] picks one by name at
//! runtime.
//!
//! ```no_run
//! use reschema_convert::{ConversionContext, ConvertOptions, SchemaExt, json_schema};
//! use reschema_core::{SchemaOptions, create};
//! use serde_json::json;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let schema = create(&json!({"items": {"validation": {"type": "string"}}}), &SchemaOptions::default()).await?;
//!
//! let mut context = ConversionContext::new();
//! let root = schema.to_json_schema(&ConvertOptions::default(), &mut context)?;
//! let document = json_schema::document(root, context);
//! assert_eq!(document, json!({"type": "array", "items": {"type": "string"}}));
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod json_schema;
pub mod options;
pub mod registry;
mod rules;
pub mod traits;
pub mod validator;

pub use context::ConversionContext;
pub use error::ConvertError;
pub use json_schema::JsonSchemaConverter;
pub use options::ConvertOptions;
pub use registry::{AnyConverter, Converted, SchemaExt, Target};
pub use traits::Converter;
pub use validator::{TypeTagged, Validator, ValidatorConverter, ValidatorKind};
