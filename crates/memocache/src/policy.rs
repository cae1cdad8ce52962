//! Eviction policy contract shared by all cache variants

use std::hash::Hash;

use memokey::Result;

use crate::config::{CacheConfig, CacheVariant};
use crate::lfu::LfuCache;
use crate::lru::LruCache;
use crate::unbounded::UnboundedCache;

/// Bounded (or unbounded) key-value store with an eviction rule
pub trait CachePolicy<K, V>: Send {
    /// Look up a value, counting it as an access
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert or replace a value
    ///
    /// Returns the entry evicted to make room, if any.
    fn put(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Remove a key, returning its value
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Number of entries currently stored
    fn len(&self) -> usize;

    /// Check if the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, `None` if unbounded
    fn capacity(&self) -> Option<usize>;

    /// Drop every entry
    fn clear(&mut self);
}

/// Instantiate the policy selected by `config`
pub(crate) fn build<K, V>(config: &CacheConfig) -> Result<Box<dyn CachePolicy<K, V>>>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    config.validate()?;

    let policy: Box<dyn CachePolicy<K, V>> = match config.variant {
        CacheVariant::Lru => Box::new(LruCache::new(config.capacity)),
        CacheVariant::Lfu => Box::new(LfuCache::new(config.capacity)),
        CacheVariant::Unbounded => Box::new(UnboundedCache::new()),
    };
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memokey::Error;

    #[test]
    fn test_build_variants() {
        let lru = build::<u32, u32>(&CacheConfig::new(CacheVariant::Lru, 3)).unwrap();
        assert_eq!(lru.capacity(), Some(3));

        let lfu = build::<u32, u32>(&CacheConfig::new(CacheVariant::Lfu, 5)).unwrap();
        assert_eq!(lfu.capacity(), Some(5));

        let unbounded = build::<u32, u32>(&CacheConfig::new(CacheVariant::Unbounded, 0)).unwrap();
        assert_eq!(unbounded.capacity(), None);
        assert!(unbounded.is_empty());
    }

    #[test]
    fn test_remove_and_clear_through_trait() {
        for variant in [CacheVariant::Lru, CacheVariant::Lfu, CacheVariant::Unbounded] {
            let mut cache = build::<u32, &str>(&CacheConfig::new(variant, 4)).unwrap();

            cache.put(1, "a");
            cache.put(2, "b");
            assert_eq!(cache.remove(&1), Some("a"));
            assert_eq!(cache.remove(&1), None);
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.len(), 1);

            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.get(&2), None);

            cache.put(3, "c");
            assert_eq!(cache.get(&3), Some(&"c"));
        }
    }

    #[test]
    fn test_build_zero_capacity() {
        let result = build::<u32, u32>(&CacheConfig::new(CacheVariant::Lru, 0));
        assert_eq!(result.err(), Some(Error::InvalidCapacity(0)));
    }
}
