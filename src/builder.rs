//! Validated construction for LRU caches.
//!
//! Collects construction parameters, validates them once, and produces either
//! a plain [`LruCache`] or, with the `concurrency` feature, a shared
//! [`ConcurrentLruCache`](crate::policy::concurrent::ConcurrentLruCache).
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::CacheBuilder;
//!
//! let mut cache = CacheBuilder::new(100).try_build::<u64, String>().unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//!
//! assert!(CacheBuilder::new(0).try_build::<u64, String>().is_err());
//! ```

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::error::ConfigError;
use crate::policy::lru::LruCache;

/// Builder for LRU caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for a cache of at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Replaces the configured capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the capacity is zero.
    pub fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.capacity).ok_or_else(|| {
            ConfigError::new(format!(
                "capacity must be greater than zero (got {})",
                self.capacity
            ))
        })
    }

    /// Builds an [`LruCache`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the capacity is zero.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.validate().map(LruCache::new)
    }

    /// Builds an [`LruCache`], panicking on invalid configuration.
    ///
    /// # Panics
    ///
    /// Panics with the [`ConfigError`] message when the capacity is zero. Use
    /// [`try_build`](Self::try_build) for user-supplied parameters.
    pub fn build<K, V>(self) -> LruCache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Builds a mutex-guarded cache that can be shared between threads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the capacity is zero.
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent<K, V>(
        self,
    ) -> Result<crate::policy::concurrent::ConcurrentLruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build()
            .map(crate::policy::concurrent::ConcurrentLruCache::from_cache)
    }
}
