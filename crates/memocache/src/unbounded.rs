//! Plain map without eviction

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::policy::CachePolicy;

/// Cache that keeps every entry for the lifetime of its owner
pub struct UnboundedCache<K, V> {
    map: HashMap<K, V, RandomState>,
}

impl<K: Hash + Eq, V> UnboundedCache<K, V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(RandomState::new()),
        }
    }
}

impl<K: Hash + Eq, V> Default for UnboundedCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CachePolicy<K, V> for UnboundedCache<K, V>
where
    K: Hash + Eq + Send,
    V: Send,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.map.insert(key, value);
        None
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn clear(&mut self) {
        self.map.clear()
    }
}
