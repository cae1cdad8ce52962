//! Memoized method wrapper
//!
//! A memoized method keeps its own signature and documentation; its body
//! hands the computation to a `static` [`Memoized`] named after the method:
//!
//! ```
//! use memocache::{CacheDirectory, CacheOwner, CacheVariant, Memoized};
//!
//! #[derive(Default)]
//! struct Model {
//!     offset: f64,
//!     caches: CacheDirectory,
//! }
//!
//! impl CacheOwner for Model {
//!     fn cache_directory(&self) -> &CacheDirectory {
//!         &self.caches
//!     }
//! }
//!
//! impl Model {
//!     /// Shift every element by the model offset.
//!     fn frob(&self, array: &[f64]) -> memocache::Result<Vec<f64>> {
//!         static FROB: Memoized = Memoized::new("frob");
//!         FROB.call(self, array, &(), || {
//!             array.iter().map(|x| x + self.offset).collect()
//!         })
//!     }
//!
//!     /// Dot product of the shifted array with itself plus `blah`.
//!     fn spam(&self, array: &[f64], blah: f64) -> memocache::Result<f64> {
//!         static SPAM: Memoized = Memoized::new("spam").variant(CacheVariant::Lfu).capacity(2);
//!         SPAM.try_call(self, array, &blah, || {
//!             let f = self.frob(array)?;
//!             Ok(f.iter().map(|x| x * x).sum::<f64>() + blah)
//!         })
//!     }
//! }
//!
//! let model = Model { offset: 1.0, ..Default::default() };
//! assert_eq!(model.frob(&[1.0, 2.0]).unwrap(), vec![2.0, 3.0]);
//! assert_eq!(model.spam(&[1.0, 2.0], 0.5).unwrap(), 13.5);
//! assert_eq!(model.cache_directory().names(), vec!["frob", "spam"]);
//! ```
//!
//! # Concurrency
//!
//! The owner's directory lock is held while the cache is resolved and
//! while the entry is looked up or stored. It is released while the call
//! key is derived and while the method body runs. Two callers missing the same key both compute and the last
//! one to finish wins, so population is at-least-once per key. Nested
//! memoized calls on the same owner, including an equal-key call of the
//! same method, therefore never deadlock; the inner call is a plain miss.
//! The same holds for `ArrayLike` and `KeyPart` impls that call memoized
//! methods of the owner.

use memokey::{ArrayLike, CallKey, Error, KeyPart, Result};
use tracing::{debug, trace};

use crate::config::{CacheConfig, CacheVariant};
use crate::directory::CacheOwner;

enum Lookup<V> {
    Hit(V),
    Miss(CallKey),
}

/// Caching front for one method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memoized {
    method: &'static str,
    config: CacheConfig,
}

impl Memoized {
    /// LRU cache of [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY) entries
    /// registered under `method`
    pub const fn new(method: &'static str) -> Self {
        Self::with_config(method, CacheConfig::DEFAULT)
    }

    /// Cache registered under `method` with an explicit configuration
    pub const fn with_config(method: &'static str, config: CacheConfig) -> Self {
        Self { method, config }
    }

    /// Select the eviction policy
    pub const fn variant(self, variant: CacheVariant) -> Self {
        Self::with_config(
            self.method,
            CacheConfig {
                variant,
                ..self.config
            },
        )
    }

    /// Set the maximum number of cached call keys per instance
    pub const fn capacity(self, capacity: usize) -> Self {
        Self::with_config(
            self.method,
            CacheConfig {
                capacity,
                ..self.config
            },
        )
    }

    /// Turn caching off; the body runs on every call
    pub const fn disabled(self) -> Self {
        Self::with_config(
            self.method,
            CacheConfig {
                enabled: false,
                ..self.config
            },
        )
    }

    /// Name the cache is registered under
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached value for `(array, rest)` or compute and cache it
    ///
    /// # Errors
    /// * `UnsupportedArgumentType` - `array` cannot be keyed
    /// * `UnhashableArgument` - `rest` cannot be keyed
    /// * `InvalidCapacity` / `CacheTypeMismatch` - the method cache cannot be resolved
    pub fn call<O, A, R, V, F>(&self, owner: &O, array: &A, rest: &R, compute: F) -> Result<V>
    where
        O: CacheOwner + ?Sized,
        A: ArrayLike + ?Sized,
        R: KeyPart + ?Sized,
        V: Clone + Send + 'static,
        F: FnOnce() -> V,
    {
        self.try_call(owner, array, rest, || Ok(compute()))
    }

    /// Like [`call`](Self::call) for a fallible body
    ///
    /// Errors from `compute` are returned unchanged and nothing is cached
    /// for them. Key and cache errors are converted with `E::from`.
    pub fn try_call<O, A, R, V, E, F>(
        &self,
        owner: &O,
        array: &A,
        rest: &R,
        compute: F,
    ) -> std::result::Result<V, E>
    where
        O: CacheOwner + ?Sized,
        A: ArrayLike + ?Sized,
        R: KeyPart + ?Sized,
        V: Clone + Send + 'static,
        E: From<Error>,
        F: FnOnce() -> std::result::Result<V, E>,
    {
        if !self.config.enabled {
            trace!(method = self.method, "caching disabled, calling through");
            return compute();
        }

        let directory = owner.cache_directory();
        directory.with_cache::<V, _>(self.method, &self.config, |_| ())?;

        // Key code is user code and may call back into this owner
        let key = CallKey::derive(array, rest)?;
        let lookup = directory.with_cache::<V, _>(self.method, &self.config, |cache| {
            match cache.lookup(&key) {
                Some(value) => Lookup::Hit(value),
                None => Lookup::Miss(key),
            }
        })?;

        let key = match lookup {
            Lookup::Hit(value) => {
                trace!(method = self.method, "cache hit");
                return Ok(value);
            }
            Lookup::Miss(key) => key,
        };

        debug!(
            method = self.method,
            fingerprint = key.array().fingerprint(),
            "cache miss"
        );
        let value = compute()?;

        let evicted = directory.with_cache::<V, _>(self.method, &self.config, |cache| {
            cache.store(key, value.clone())
        })?;
        if let Some(evicted) = evicted {
            debug!(
                method = self.method,
                fingerprint = evicted.array().fingerprint(),
                "evicted cache entry"
            );
        }

        Ok(value)
    }
}
