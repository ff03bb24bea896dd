//! Per-owner memoization cache.
//!
//! The first lookup of a key stores either the supplied value or the result
//! of the supplied computation; every later lookup returns the stored entry
//! without recomputing it. Entries are never evicted and live as long as the
//! owning cache.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Lazy cache keyed by name.
///
/// Values are handed out by clone, so cheap-to-clone values (`Arc`, small
/// copies) are the intended payload. Each key owns its own slot: the map lock
/// is only held to find the slot, and the computation runs against the slot
/// alone. A computation may fill other keys of the same cache, but must not
/// ask for its own key.
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: K) -> Arc<OnceLock<V>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_default())
    }

    /// Return the entry for `key`, computing it with `init` on first use.
    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> V {
        self.slot(key).get_or_init(init).clone()
    }

    /// Return the entry for `key`, storing `value` as-is on first use.
    ///
    /// A later call with a different value still returns the first one.
    pub fn get_or_insert(&self, key: K, value: V) -> V {
        self.get_or_insert_with(key, || value)
    }

    /// Look up an entry without inserting.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of filled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_per_key() {
        let cache: Cache<&str, u32> = Cache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            42
        };

        assert_eq!(cache.get_or_insert_with("answer", compute), 42);
        assert_eq!(cache.get_or_insert_with("answer", || 7), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn stores_plain_values() {
        let cache = Cache::new();
        assert_eq!(cache.get_or_insert("a", "first"), "first");
        assert_eq!(cache.get_or_insert("a", "second"), "first");
        assert_eq!(cache.get_or_insert("b", "second"), "second");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_does_not_insert() {
        let cache: Cache<String, i64> = Cache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"missing".to_string()), None);
        assert!(!cache.contains(&"missing".to_string()));
        assert!(cache.is_empty());
    }

    #[test]
    fn computation_may_fill_other_keys() {
        let cache: Cache<&str, u32> = Cache::new();
        let outer = cache.get_or_insert_with("outer", || {
            cache.get_or_insert_with("inner", || 1) + 1
        });

        assert_eq!(outer, 2);
        assert_eq!(cache.get(&"inner"), Some(1));
        assert_eq!(cache.len(), 2);
    }
}
