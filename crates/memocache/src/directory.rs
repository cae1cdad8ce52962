//! Per-instance cache directory
//!
//! Every type with memoized methods embeds one [`CacheDirectory`] and
//! exposes it through [`CacheOwner`]. The directory maps method names to
//! their caches and is dropped together with its owner.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use ahash::RandomState;
use memokey::{Error, Result};
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheInfo, ErasedCache, MethodCache};
use crate::config::CacheConfig;

type CacheMap = HashMap<&'static str, Box<dyn ErasedCache>, RandomState>;

/// Capability of types whose methods are memoized
pub trait CacheOwner {
    /// Directory holding this instance's method caches
    fn cache_directory(&self) -> &CacheDirectory;
}

/// Method name to method cache mapping of one instance
///
/// The map is allocated on the first memoized call. Inspection methods
/// never allocate it, never create caches and never touch recency or
/// statistics.
#[derive(Default)]
pub struct CacheDirectory {
    caches: OnceLock<Mutex<CacheMap>>,
}

impl CacheDirectory {
    /// Create an empty, uninitialised directory
    pub const fn new() -> Self {
        Self {
            caches: OnceLock::new(),
        }
    }

    /// Whether any memoized method has been called yet
    pub fn is_initialized(&self) -> bool {
        self.caches.get().is_some()
    }

    /// Number of method caches
    pub fn len(&self) -> usize {
        self.caches.get().map_or(0, |caches| caches.lock().len())
    }

    /// Check if no method cache exists
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if `method` has a cache
    pub fn contains(&self, method: &str) -> bool {
        self.caches
            .get()
            .is_some_and(|caches| caches.lock().contains_key(method))
    }

    /// Names of methods with a cache, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = match self.caches.get() {
            Some(caches) => caches.lock().keys().copied().collect(),
            None => Vec::new(),
        };
        names.sort_unstable();
        names
    }

    /// Snapshot of one method's cache
    pub fn info(&self, method: &str) -> Option<CacheInfo> {
        self.caches
            .get()?
            .lock()
            .get_key_value(method)
            .map(|(&name, cache)| cache.info(name))
    }

    /// Snapshots of all method caches, sorted by method name
    pub fn snapshot(&self) -> Vec<CacheInfo> {
        let mut infos: Vec<_> = match self.caches.get() {
            Some(caches) => caches
                .lock()
                .iter()
                .map(|(&name, cache)| cache.info(name))
                .collect(),
            None => Vec::new(),
        };
        infos.sort_unstable_by_key(|info| info.method);
        infos
    }

    /// Run `f` on the cache of `method`, creating it from `config` if absent
    ///
    /// The directory lock is held while `f` runs.
    pub(crate) fn with_cache<V, T>(
        &self,
        method: &'static str,
        config: &CacheConfig,
        f: impl FnOnce(&mut MethodCache<V>) -> T,
    ) -> Result<T>
    where
        V: Clone + Send + 'static,
    {
        let caches = self.caches.get_or_init(|| {
            debug!("initialized cache directory");
            Mutex::new(CacheMap::default())
        });
        let mut caches = caches.lock();

        let cache = match caches.entry(method) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let cache = MethodCache::<V>::new(config)?;
                debug!(
                    method,
                    variant = %config.variant,
                    capacity = config.capacity,
                    "created method cache"
                );
                entry.insert(Box::new(cache))
            }
        };

        let cache = cache
            .as_any_mut()
            .downcast_mut::<MethodCache<V>>()
            .ok_or(Error::CacheTypeMismatch(method))?;
        Ok(f(cache))
    }
}

impl fmt::Debug for CacheDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for info in self.snapshot() {
            map.entry(&info.method, &format_args!("{}", info));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheVariant;
    use memokey::CallKey;

    #[test]
    fn test_directory_lazy() {
        let dir = CacheDirectory::new();

        assert!(!dir.is_initialized());
        assert!(dir.is_empty());
        assert!(dir.names().is_empty());
        assert!(dir.info("frob").is_none());
        assert!(!dir.is_initialized());

        dir.with_cache::<u32, _>("frob", &CacheConfig::default(), |_| ())
            .unwrap();

        assert!(dir.is_initialized());
        assert_eq!(dir.len(), 1);
        assert!(dir.contains("frob"));
    }

    #[test]
    fn test_directory_one_cache_per_method() {
        let dir = CacheDirectory::new();
        let config = CacheConfig::new(CacheVariant::Lru, 4);
        let key = CallKey::derive(&[1.0f64], &()).unwrap();

        dir.with_cache::<u32, _>("frob", &config, |cache| cache.store(key.clone(), 7))
            .unwrap();
        let hit = dir
            .with_cache::<u32, _>("frob", &config, |cache| cache.lookup(&key))
            .unwrap();

        assert_eq!(hit, Some(7));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.info("frob").unwrap().len, 1);
    }

    #[test]
    fn test_directory_type_mismatch() {
        let dir = CacheDirectory::new();
        let config = CacheConfig::default();

        dir.with_cache::<u32, _>("frob", &config, |_| ()).unwrap();
        let err = dir
            .with_cache::<String, _>("frob", &config, |_| ())
            .unwrap_err();

        assert_eq!(err, Error::CacheTypeMismatch("frob"));
    }

    #[test]
    fn test_directory_invalid_capacity_creates_nothing() {
        let dir = CacheDirectory::new();
        let config = CacheConfig::new(CacheVariant::Lru, 0);

        let err = dir.with_cache::<u32, _>("frob", &config, |_| ()).unwrap_err();

        assert_eq!(err, Error::InvalidCapacity(0));
        assert!(!dir.contains("frob"));
    }

    #[test]
    fn test_directory_snapshot_and_debug() {
        let dir = CacheDirectory::new();
        let lfu = CacheConfig::new(CacheVariant::Lfu, 2);
        let key = CallKey::derive(&[1.0f64], &()).unwrap();

        dir.with_cache::<u32, _>("spam", &lfu, |_| ()).unwrap();
        dir.with_cache::<u32, _>("frob", &CacheConfig::default(), |cache| {
            cache.store(key, 1)
        })
        .unwrap();

        assert_eq!(dir.names(), vec!["frob", "spam"]);
        let infos = dir.snapshot();
        assert_eq!(infos[0].method, "frob");
        assert_eq!(infos[1].variant, CacheVariant::Lfu);

        assert_eq!(
            format!("{:?}", dir),
            r#"{"frob": LruCache(maxsize=64, currsize=1), "spam": LfuCache(maxsize=2, currsize=0)}"#
        );
    }
}
