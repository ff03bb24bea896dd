//! # reschema-core
//!
//! Resolution engine for the reschema schema-definition language.
//!
//! A raw schema (usually parsed from JSON) is shape-checked synchronously into
//! a [`RawSchema`], then resolved asynchronously into an immutable [`Schema`]
//! graph. Named type references are fetched through an injected
//! [`TypeLoader`]; `extend` parents are merged into Value nodes while the
//! graph is built.
//!
//! ```text
//! raw JSON ──parse──> RawSchema ──load──> Schema
//!   "name"              Reference           Type ─> inner Schema
//!   [a, b]              Alternatives        Alternatives ─> [Property]
//!   {items}             Array               Array ─> items
//!   {extend, ...}       Value               Value (merged properties/validation)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use reschema_core::{MapLoader, SchemaOptions, TypeDescriptor, create};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), reschema_core::SchemaError> {
//! let loader = MapLoader::new().with(TypeDescriptor::new(
//!     "common/id",
//!     json!({"validation": {"type": "string"}}),
//! ));
//! let options = SchemaOptions::default().with_loader(loader);
//!
//! let schema = create(&json!({"properties": {"id": "common/id"}}), &options).await?;
//! assert!(schema.properties().is_some_and(|p| p.contains_key("id")));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod meta;
pub mod node;
pub mod raw;
pub mod resolver;

pub use cache::Cache;
pub use error::SchemaError;
pub use loader::{
    AsyncFnLoader, DirectoryLoader, FnLoader, MapLoader, TypeDescriptor, TypeLoader, async_loader_fn,
    loader_fn,
};
pub use meta::{Meta, Validation, ValueMeta};
pub use node::{
    AlternativesSchema, ArraySchema, Properties, PropertySchema, Schema, SchemaKind, TypeSchema,
    ValueSchema,
};
pub use raw::RawSchema;
pub use resolver::{Resolver, SchemaOptions, create};
