//! Asynchronous resolution of raw schemas into the node graph.
//!
//! Resolution is split in three phases. [`Resolver::parse`] checks the shape
//! of the whole raw tree synchronously and fails fast when a reference is
//! present but no loader was configured. [`Resolver::load`] then fetches every
//! type the tree reaches, one wave of concurrent loader calls per depth, and
//! finally builds the node graph. Sibling properties and `extend` parents are
//! built concurrently; results keep declaration order.
//!
//! Each resolver caches loaded descriptors and built types per name. A loader
//! is called at most once per name for the lifetime of the resolver, and every
//! reference to a type shares one [`TypeSchema`] node.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::cache::Cache;
use crate::error::SchemaError;
use crate::loader::{TypeDescriptor, TypeLoader};
use crate::meta::Meta;
use crate::node::{
    AlternativesSchema, ArraySchema, Properties, PropertySchema, Schema, TypeSchema, ValueSchema,
};
use crate::raw::{RawProperty, RawSchema, RawValue};

/// A fetched descriptor with its schema already shape-checked.
#[derive(Debug)]
struct LoadedType {
    name: String,
    meta: Meta,
    body: TypeBody,
}

#[derive(Debug)]
enum TypeBody {
    Alias(String),
    Schema(RawSchema),
}

impl LoadedType {
    fn from_descriptor(requested: &str, descriptor: TypeDescriptor) -> Result<Self, SchemaError> {
        let malformed = |reason: String| SchemaError::MalformedDescriptor {
            name: requested.to_string(),
            reason,
        };

        if descriptor.name.is_empty() {
            return Err(malformed("descriptor has no name".to_string()));
        }
        let body = match descriptor.alias_target() {
            Some("") => return Err(malformed("alias target is empty".to_string())),
            Some(target) => TypeBody::Alias(target.to_string()),
            None if descriptor.schema.is_null() => {
                TypeBody::Schema(RawSchema::Value(RawValue::default()))
            }
            None => TypeBody::Schema(
                RawSchema::parse_at(&descriptor.schema, requested)
                    .map_err(|err| malformed(err.to_string()))?,
            ),
        };

        Ok(Self {
            name: descriptor.name,
            meta: descriptor.meta.unwrap_or_default(),
            body,
        })
    }

    fn references(&self) -> Vec<&str> {
        match &self.body {
            TypeBody::Alias(target) => vec![target.as_str()],
            TypeBody::Schema(raw) => raw.references(),
        }
    }
}

type LoadedCell = Arc<OnceCell<Arc<LoadedType>>>;

/// Construction options shared by every node of one resolution.
#[derive(Clone, Default)]
pub struct SchemaOptions {
    loader: Option<Arc<dyn TypeLoader>>,
}

impl SchemaOptions {
    #[must_use]
    pub fn with_loader(self, loader: impl TypeLoader + 'static) -> Self {
        self.with_shared_loader(Arc::new(loader))
    }

    /// Use a loader that is already shared with other owners.
    #[must_use]
    pub fn with_shared_loader(mut self, loader: Arc<dyn TypeLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    #[must_use]
    pub fn loader(&self) -> Option<&Arc<dyn TypeLoader>> {
        self.loader.as_ref()
    }
}

impl fmt::Debug for SchemaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaOptions")
            .field("loader", &self.loader.as_ref().map(|_| "<dyn TypeLoader>"))
            .finish()
    }
}

/// Resolves raw schemas against one loader, caching descriptors and types.
pub struct Resolver {
    loader: Option<Arc<dyn TypeLoader>>,
    descriptors: Cache<String, LoadedCell>,
    types: Cache<String, Arc<TypeSchema>>,
}

impl Resolver {
    #[must_use]
    pub fn new(options: &SchemaOptions) -> Self {
        Self {
            loader: options.loader.clone(),
            descriptors: Cache::new(),
            types: Cache::new(),
        }
    }

    /// Shape-check a raw schema without loading anything.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Shape`] for malformed input, or
    /// [`SchemaError::MissingLoader`] when the tree references a named type
    /// and this resolver has no loader.
    pub fn parse(&self, raw: &Value) -> Result<RawSchema, SchemaError> {
        let parsed = RawSchema::parse(raw)?;
        self.require_loader(&parsed)?;
        Ok(parsed)
    }

    /// Resolve a shape-checked schema into the node graph.
    ///
    /// May be called any number of times; descriptors and types already
    /// resolved by this resolver are reused.
    ///
    /// # Errors
    ///
    /// Returns the first failure among all concurrently resolved children:
    /// a loader error, a malformed descriptor, or a reference cycle.
    pub async fn load(&self, raw: &RawSchema) -> Result<Schema, SchemaError> {
        self.require_loader(raw)?;
        self.prefetch(raw.references()).await?;
        self.resolve(raw, &[]).await
    }

    /// [`parse`](Self::parse) then [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// See both phases.
    pub async fn create(&self, raw: &Value) -> Result<Schema, SchemaError> {
        let parsed = self.parse(raw)?;
        self.load(&parsed).await
    }

    /// Resolve a single named type.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), plus [`SchemaError::MissingLoader`] when
    /// no loader is configured.
    pub async fn create_type(&self, name: &str) -> Result<Arc<TypeSchema>, SchemaError> {
        self.prefetch(vec![name]).await?;
        self.resolve_type(name, &[]).await
    }

    /// Number of type names this resolver has loaded.
    #[must_use]
    pub fn cached_types(&self) -> usize {
        self.descriptors.len()
    }

    fn require_loader(&self, raw: &RawSchema) -> Result<(), SchemaError> {
        if self.loader.is_some() {
            return Ok(());
        }
        match raw.references().first() {
            Some(name) => Err(SchemaError::MissingLoader {
                name: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Load every descriptor reachable from `roots`, one concurrent wave per
    /// depth. Types already built are skipped along with what they reach.
    async fn prefetch(&self, roots: Vec<&str>) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        let mut pending = self.unseen(roots, &mut seen);

        while !pending.is_empty() {
            tracing::trace!(count = pending.len(), "fetching type descriptors");
            let loaded = try_join_all(pending.iter().map(|name| self.fetch(name))).await?;
            pending = self.unseen(loaded.iter().flat_map(|ty| ty.references()), &mut seen);
        }
        Ok(())
    }

    fn unseen<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        seen: &mut HashSet<String>,
    ) -> Vec<String> {
        names
            .into_iter()
            .map(str::to_string)
            .filter(|name| !self.types.contains(name) && seen.insert(name.clone()))
            .collect()
    }

    fn resolve<'a>(
        &'a self,
        raw: &'a RawSchema,
        chain: &'a [String],
    ) -> BoxFuture<'a, Result<Schema, SchemaError>> {
        async move {
            match raw {
                RawSchema::Reference(name) => {
                    self.resolve_type(name, chain).await.map(Schema::Type)
                }
                RawSchema::Alternatives(alternatives) => {
                    let resolved = try_join_all(
                        alternatives
                            .alternatives
                            .iter()
                            .map(|property| self.resolve_property(property, chain)),
                    )
                    .await?;
                    Ok(AlternativesSchema::new(resolved).into())
                }
                RawSchema::Array(array) => {
                    let items = self.resolve(&array.items, chain).await?;
                    Ok(ArraySchema::new(items, array.validation.clone(), array.meta.clone()).into())
                }
                RawSchema::Value(value) => self.resolve_value(value, chain).await.map(Schema::Value),
            }
        }
        .boxed()
    }

    async fn resolve_value(
        &self,
        value: &RawValue,
        chain: &[String],
    ) -> Result<ValueSchema, SchemaError> {
        let properties = try_join_all(value.properties.iter().map(|(name, raw)| async move {
            let property = self.resolve_property(raw, chain).await?;
            Ok::<_, SchemaError>((name.clone(), Arc::new(property)))
        }));
        let extend = try_join_all(
            value
                .extend
                .iter()
                .map(|parent| async move { self.resolve(parent, chain).await.map(Arc::new) }),
        );

        let (properties, extend) = tokio::try_join!(properties, extend)?;
        Ok(ValueSchema::new(
            extend,
            properties.into_iter().collect::<Properties>(),
            value.validation.clone(),
            value.meta.clone(),
        ))
    }

    async fn resolve_property(
        &self,
        raw: &RawProperty,
        chain: &[String],
    ) -> Result<PropertySchema, SchemaError> {
        let schema = self.resolve(&raw.schema, chain).await?;
        Ok(PropertySchema::new(raw.meta.clone(), schema))
    }

    fn resolve_type<'a>(
        &'a self,
        name: &'a str,
        chain: &'a [String],
    ) -> BoxFuture<'a, Result<Arc<TypeSchema>, SchemaError>> {
        async move {
            if chain.iter().any(|seen| seen == name) {
                let mut cycle = chain.to_vec();
                cycle.push(name.to_string());
                return Err(SchemaError::CyclicReference { chain: cycle });
            }

            let key = name.to_string();
            if let Some(ty) = self.types.get(&key) {
                tracing::trace!(name, "type cache hit");
                return Ok(ty);
            }

            let loaded = self.fetch(name).await?;
            let mut path = chain.to_vec();
            path.push(key.clone());

            let ty = match &loaded.body {
                TypeBody::Alias(target) => {
                    tracing::debug!(name, to = %target, "following type alias");
                    self.resolve_type(target, &path).await?
                }
                TypeBody::Schema(raw) => {
                    let schema = self.resolve(raw, &path).await?;
                    tracing::trace!(name, kind = %schema.kind(), "type resolved");
                    Arc::new(TypeSchema::new(
                        loaded.name.clone(),
                        loaded.meta.clone(),
                        schema,
                    ))
                }
            };
            Ok(self.types.get_or_insert(key, ty))
        }
        .boxed()
    }

    async fn fetch(&self, name: &str) -> Result<Arc<LoadedType>, SchemaError> {
        let loader = self.loader.as_ref().ok_or_else(|| SchemaError::MissingLoader {
            name: name.to_string(),
        })?;

        let cell = self
            .descriptors
            .get_or_insert_with(name.to_string(), || Arc::new(OnceCell::new()));
        if let Some(loaded) = cell.get() {
            tracing::trace!(name, "type descriptor cache hit");
            return Ok(Arc::clone(loaded));
        }

        let loaded = cell
            .get_or_try_init(|| async {
                tracing::debug!(name, "loading type");
                let descriptor =
                    loader
                        .load(name)
                        .await
                        .map_err(|source| SchemaError::Resolution {
                            name: name.to_string(),
                            source,
                        })?;
                LoadedType::from_descriptor(name, descriptor).map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(loaded))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("has_loader", &self.loader.is_some())
            .field("cached_types", &self.descriptors.len())
            .field("built_types", &self.types.len())
            .finish()
    }
}

/// Shape-check and resolve `raw` with a fresh [`Resolver`].
///
/// # Errors
///
/// See [`Resolver::create`].
pub async fn create(raw: &Value, options: &SchemaOptions) -> Result<Schema, SchemaError> {
    Resolver::new(options).create(raw).await
}
