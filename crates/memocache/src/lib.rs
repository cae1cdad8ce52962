//! # memocache
//!
//! Per-instance, per-method memoization for methods whose main argument
//! is a numeric array.
//!
//! ## Architecture
//! - **CacheOwner**: types embed a [`CacheDirectory`] and expose it
//! - **CacheDirectory**: method name -> method cache, allocated lazily
//! - **Memoized**: `static` front for one method; derives the call key,
//!   returns hits, runs the body on misses and stores the result
//! - **CachePolicy**: LRU, LFU or unbounded eviction per method cache
//!
//! Keys come from [`memokey`]: the array argument is copied into an
//! [`ArrayKey`], trailing arguments become an [`ArgKey`].

#![warn(missing_docs)]

mod cache;
mod config;
mod directory;
mod lfu;
mod lru;
mod memoized;
mod policy;
mod stats;
mod unbounded;

pub use cache::CacheInfo;
pub use config::{CacheConfig, CacheVariant, DEFAULT_CAPACITY};
pub use directory::{CacheDirectory, CacheOwner};
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use memoized::Memoized;
pub use policy::CachePolicy;
pub use stats::CacheStats;
pub use unbounded::UnboundedCache;

pub use memokey::{
    ArgKey, Array, ArrayKey, ArrayLike, CallKey, Element, ElementType, Error, KeyPart, Kwargs,
    Result,
};
