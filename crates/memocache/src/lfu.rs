//! LFU (Least Frequently Used) cache
//!
//! Entries are ordered by `(frequency, last access)`, so among equally
//! frequent entries the least recently used one goes first.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use ahash::RandomState;

use crate::policy::CachePolicy;

struct Entry<V> {
    value: V,
    frequency: u64,
    tick: u64,
}

/// LFU cache with fixed capacity
pub struct LfuCache<K, V> {
    map: HashMap<K, Entry<V>, RandomState>,
    order: BTreeMap<(u64, u64), K>,
    tick: u64,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LFU cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            order: BTreeMap::new(),
            tick: 0,
            capacity,
        }
    }

    /// Get a value and count the access
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.map.get_mut(key)?;
        self.order.remove(&(entry.frequency, entry.tick));

        self.tick += 1;
        entry.frequency = entry.frequency.saturating_add(1);
        entry.tick = self.tick;
        self.order.insert((entry.frequency, entry.tick), key.clone());

        Some(&entry.value)
    }

    /// Insert a key-value pair, evicting the least frequently used entry when full
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.map.contains_key(&key) {
            if let Some(entry) = self.map.get_mut(&key) {
                entry.value = value;
            }
            self.get(&key);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        self.tick += 1;
        self.order.insert((1, self.tick), key.clone());
        self.map.insert(
            key,
            Entry {
                value,
                frequency: 1,
                tick: self.tick,
            },
        );

        evicted
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        self.order.remove(&(entry.frequency, entry.tick));
        Some(entry.value)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Access count of a stored key
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|entry| entry.frequency)
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.value))
    }
}

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Send,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        LfuCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }
}
