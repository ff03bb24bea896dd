//! Named-type loading.
//!
//! Type references are resolved through an injected [`TypeLoader`]. Hosts
//! decide where definitions live (memory, files, a registry service); the
//! resolver only needs a descriptor per name.
//!
//! Provided implementations:
//! - [`MapLoader`]: in-memory descriptors keyed by name
//! - [`DirectoryLoader`]: one JSON file per type under a root directory
//! - [`loader_fn`]: wraps a synchronous closure
//! - [`async_loader_fn`]: wraps a closure returning a future

mod directory;

pub use directory::DirectoryLoader;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meta::Meta;

/// Definition of a named type as returned by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name. File-backed loaders fill it in from the requested name when
    /// the file omits it.
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Raw schema of the type, or a string naming another type (an alias).
    #[serde(default)]
    pub schema: Value,
}

impl TypeDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            meta: None,
            schema,
        }
    }

    /// Descriptor that resolves to another named type.
    #[must_use]
    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, Value::String(target.into()))
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Target name when this descriptor is an alias.
    #[must_use]
    pub fn alias_target(&self) -> Option<&str> {
        self.schema.as_str()
    }
}

/// Capability that maps a type name to its definition.
///
/// Implementations may complete immediately or perform I/O; the resolver
/// awaits the returned future either way. Errors abort the enclosing
/// resolution and are reported as
/// [`SchemaError::Resolution`](crate::SchemaError::Resolution). Retrying is
/// the loader's business.
pub trait TypeLoader: Send + Sync {
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>>;
}

impl<T: TypeLoader + ?Sized> TypeLoader for Arc<T> {
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>> {
        (**self).load(name)
    }
}

// ── In-memory ──────────────────────────────────────────────────────

/// Loader backed by an in-memory map of descriptors.
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    types: HashMap<String, TypeDescriptor>,
}

impl MapLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor under its own name.
    #[must_use]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Add or replace a descriptor, returning the previous one.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
        self.types.insert(descriptor.name.clone(), descriptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDescriptor> for MapLoader {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl TypeLoader for MapLoader {
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>> {
        let found = self
            .types
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown type '{name}'"));
        futures::future::ready(found).boxed()
    }
}

// ── Closures ───────────────────────────────────────────────────────

/// Loader wrapping a synchronous closure. See [`loader_fn`].
pub struct FnLoader<F> {
    f: F,
}

/// Wrap a closure that returns a descriptor immediately.
pub const fn loader_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn(&str) -> anyhow::Result<TypeDescriptor> + Send + Sync,
{
    FnLoader { f }
}

impl<F> TypeLoader for FnLoader<F>
where
    F: Fn(&str) -> anyhow::Result<TypeDescriptor> + Send + Sync,
{
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>> {
        futures::future::ready((self.f)(name)).boxed()
    }
}

/// Loader wrapping a closure that returns a future. See [`async_loader_fn`].
pub struct AsyncFnLoader<F> {
    f: F,
}

/// Wrap a closure that fetches a descriptor asynchronously.
pub const fn async_loader_fn<F, Fut>(f: F) -> AsyncFnLoader<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<TypeDescriptor>> + Send + 'static,
{
    AsyncFnLoader { f }
}

impl<F, Fut> TypeLoader for AsyncFnLoader<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<TypeDescriptor>> + Send + 'static,
{
    fn load<'a>(&'a self, name: &'a str) -> BoxFuture<'a, anyhow::Result<TypeDescriptor>> {
        (self.f)(name.to_string()).boxed()
    }
}
