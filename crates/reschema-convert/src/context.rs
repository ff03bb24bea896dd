//! Definition registry shared across one conversion.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::error::ConvertError;

/// Named definitions collected while converting.
///
/// Serializes as `{"definitions": {...}}` so it can be spliced into an
/// emitted document. Registration is idempotent for equal content; a second
/// registration with different content under the same key fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionContext<T> {
    pub definitions: BTreeMap<String, T>,
}

impl<T> Default for ConversionContext<T> {
    fn default() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }
}

impl<T> ConversionContext<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.definitions.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<T: PartialEq> ConversionContext<T> {
    /// Register `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::ConflictingDefinition`] when `key` already
    /// holds a different value.
    pub fn register(&mut self, key: impl Into<String>, value: T) -> Result<(), ConvertError> {
        match self.definitions.entry(key.into()) {
            Entry::Vacant(slot) => {
                tracing::debug!(key = %slot.key(), "definition registered");
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == value => Ok(()),
            Entry::Occupied(slot) => Err(ConvertError::ConflictingDefinition {
                key: slot.key().clone(),
            }),
        }
    }

    /// Move every definition into `target`, wrapping each with `wrap`.
    ///
    /// # Errors
    ///
    /// Fails on the first key that conflicts with an existing definition in
    /// `target`; definitions merged before it stay merged.
    pub fn merge_into<U: PartialEq>(
        self,
        target: &mut ConversionContext<U>,
        wrap: impl Fn(T) -> U,
    ) -> Result<(), ConvertError> {
        for (key, value) in self.definitions {
            target.register(key, wrap(value))?;
        }
        Ok(())
    }
}
