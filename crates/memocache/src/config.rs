//! Method cache configuration

use std::fmt;

use memokey::{Error, Result};
use serde::{Deserialize, Serialize};

/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 64;

/// Eviction policy of a method cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheVariant {
    /// Evict the least recently used entry
    #[default]
    Lru,
    /// Evict the least frequently used entry
    Lfu,
    /// Never evict; capacity is ignored
    Unbounded,
}

impl CacheVariant {
    /// Type name used when rendering a cache
    pub fn cache_name(self) -> &'static str {
        match self {
            CacheVariant::Lru => "LruCache",
            CacheVariant::Lfu => "LfuCache",
            CacheVariant::Unbounded => "UnboundedCache",
        }
    }

    /// Whether the variant evicts at capacity
    pub fn is_bounded(self) -> bool {
        !matches!(self, CacheVariant::Unbounded)
    }
}

impl fmt::Display for CacheVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheVariant::Lru => "lru",
            CacheVariant::Lfu => "lfu",
            CacheVariant::Unbounded => "unbounded",
        })
    }
}

/// How one memoized method caches its results
///
/// Deserializes with defaults for missing fields, e.g.
/// `{"variant": "lfu", "capacity": 2}` or `{"enabled": false}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Eviction policy
    pub variant: CacheVariant,

    /// Maximum number of distinct call keys kept per instance
    pub capacity: usize,

    /// When false the method body runs on every call and nothing is cached
    pub enabled: bool,
}

impl CacheConfig {
    /// LRU with [`DEFAULT_CAPACITY`]
    pub const DEFAULT: Self = Self::new(CacheVariant::Lru, DEFAULT_CAPACITY);

    /// Enabled cache of the given variant and capacity
    pub const fn new(variant: CacheVariant, capacity: usize) -> Self {
        Self {
            variant,
            capacity,
            enabled: true,
        }
    }

    /// Configuration that turns caching off
    pub const fn disabled() -> Self {
        Self {
            variant: CacheVariant::Lru,
            capacity: DEFAULT_CAPACITY,
            enabled: false,
        }
    }

    /// Check that a bounded variant has room for at least one entry
    pub fn validate(&self) -> Result<()> {
        if self.variant.is_bounded() && self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.variant, CacheVariant::Lru);
        assert_eq!(config.capacity, 64);
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        assert_eq!(
            CacheConfig::new(CacheVariant::Lfu, 0).validate(),
            Err(Error::InvalidCapacity(0))
        );
        assert!(CacheConfig::new(CacheVariant::Unbounded, 0).validate().is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"variant": "lfu", "capacity": 2}"#).unwrap();
        assert_eq!(config, CacheConfig::new(CacheVariant::Lfu, 2));

        let config: CacheConfig = serde_json::from_str(r#"{"capacity": 8}"#).unwrap();
        assert_eq!(config.variant, CacheVariant::Lru);

        let config: CacheConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert_eq!(config, CacheConfig::disabled());
    }

    #[test]
    fn test_config_disabled_json() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"variant": "lfu", "capacity": 8, "enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.variant, CacheVariant::Lfu);
        assert_eq!(config.capacity, 8);

        // Disabling is a flag, not a variant
        assert!(serde_json::from_str::<CacheConfig>(r#"{"variant": "disabled"}"#).is_err());

        let json = serde_json::to_string(&CacheConfig::disabled()).unwrap();
        assert!(json.contains(r#""enabled":false"#));
    }

    #[test]
    fn test_config_rejects_unknown() {
        assert!(serde_json::from_str::<CacheConfig>(r#"{"size": 2}"#).is_err());
        assert!(serde_json::from_str::<CacheConfig>(r#"{"variant": "fifo"}"#).is_err());
    }

    #[test]
    fn test_config_roundtrip_names() {
        let json = serde_json::to_string(&CacheConfig::new(CacheVariant::Unbounded, 1)).unwrap();
        assert!(json.contains(r#""variant":"unbounded""#));
        assert_eq!(CacheVariant::Lfu.to_string(), "lfu");
        assert_eq!(CacheVariant::Lfu.cache_name(), "LfuCache");
    }
}
