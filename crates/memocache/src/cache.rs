//! Per-method cache: eviction policy plus statistics

use std::any::Any;
use std::fmt;

use memokey::{CallKey, Result};

use crate::config::{CacheConfig, CacheVariant};
use crate::policy::{self, CachePolicy};
use crate::stats::CacheStats;

/// Snapshot of one method cache, for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInfo {
    /// Method name the cache is registered under
    pub method: &'static str,

    /// Eviction policy
    pub variant: CacheVariant,

    /// Current number of entries
    pub len: usize,

    /// Maximum number of entries, `None` if unbounded
    pub capacity: Option<usize>,

    /// Counters since the cache was created
    pub stats: CacheStats,
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(maxsize=", self.variant.cache_name())?;
        match self.capacity {
            Some(cap) => write!(f, "{}", cap)?,
            None => f.write_str("None")?,
        }
        write!(f, ", currsize={})", self.len)
    }
}

/// Results of one method on one instance
pub(crate) struct MethodCache<V> {
    variant: CacheVariant,
    policy: Box<dyn CachePolicy<CallKey, V>>,
    stats: CacheStats,
}

impl<V: Clone + Send + 'static> MethodCache<V> {
    pub(crate) fn new(config: &CacheConfig) -> Result<Self> {
        Ok(Self {
            variant: config.variant,
            policy: policy::build(config)?,
            stats: CacheStats::new(),
        })
    }

    /// Clone of the stored value, counting a hit or a miss
    pub(crate) fn lookup(&mut self, key: &CallKey) -> Option<V> {
        match self.policy.get(key) {
            Some(value) => {
                let value = value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Store a computed value, returning the key evicted for it
    pub(crate) fn store(&mut self, key: CallKey, value: V) -> Option<CallKey> {
        self.stats.record_insert();
        let (evicted, _) = self.policy.put(key, value)?;
        self.stats.record_eviction();
        Some(evicted)
    }
}

/// Type-erased method cache as stored in a directory
pub(crate) trait ErasedCache: Any + Send {
    fn info(&self, method: &'static str) -> CacheInfo;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<V: Clone + Send + 'static> ErasedCache for MethodCache<V> {
    fn info(&self, method: &'static str) -> CacheInfo {
        CacheInfo {
            method,
            variant: self.variant,
            len: self.policy.len(),
            capacity: self.policy.capacity(),
            stats: self.stats,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memokey::KeyPart;

    fn key(values: &[f64]) -> CallKey {
        CallKey::derive(values, &()).unwrap()
    }

    #[test]
    fn test_method_cache_hit_miss() {
        let mut cache = MethodCache::<f64>::new(&CacheConfig::default()).unwrap();

        assert_eq!(cache.lookup(&key(&[1.0])), None);
        assert_eq!(cache.store(key(&[1.0]), 2.0), None);
        assert_eq!(cache.lookup(&key(&[1.0])), Some(2.0));

        let info = cache.info("frob");
        assert_eq!(info.len, 1);
        assert_eq!(info.capacity, Some(64));
        assert_eq!(info.stats.hits(), 1);
        assert_eq!(info.stats.misses(), 1);
        assert_eq!(info.stats.inserts(), 1);
    }

    #[test]
    fn test_method_cache_eviction_reported() {
        let config = CacheConfig::new(CacheVariant::Lru, 1);
        let mut cache = MethodCache::<u8>::new(&config).unwrap();

        cache.store(key(&[1.0]), 1);
        let evicted = cache.store(key(&[2.0]), 2).unwrap();

        assert_eq!(evicted, key(&[1.0]));
        assert_eq!(cache.info("m").stats.evictions(), 1);
    }

    #[test]
    fn test_method_cache_rest_args_in_key() {
        let mut cache = MethodCache::<u8>::new(&CacheConfig::default()).unwrap();
        let array = [1.0f64, 2.0];
        let k5 = CallKey::new(memokey::ArrayKey::derive(&array).unwrap(), 5.0f64.key_part().unwrap());
        let k6 = CallKey::derive(&array, &6.0f64).unwrap();

        cache.store(k5.clone(), 5);
        assert_eq!(cache.lookup(&k6), None);
        assert_eq!(cache.lookup(&k5), Some(5));
    }

    #[test]
    fn test_cache_info_display() {
        let info = CacheInfo {
            method: "frob",
            variant: CacheVariant::Lru,
            len: 1,
            capacity: Some(64),
            stats: CacheStats::new(),
        };
        assert_eq!(info.to_string(), "LruCache(maxsize=64, currsize=1)");

        let info = CacheInfo {
            variant: CacheVariant::Unbounded,
            capacity: None,
            ..info
        };
        assert_eq!(info.to_string(), "UnboundedCache(maxsize=None, currsize=1)");
    }
}
