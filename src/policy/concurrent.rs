//! Thread-safe handle around [`LruCache`].
//!
//! The cache core has no internal locking. This wrapper is the external
//! lock it expects: one `parking_lot::Mutex` around the whole cache, so a
//! `get`'s promotion and a `put`'s eviction can never interleave. A
//! read-write lock would buy nothing here because `get` mutates the
//! recency list.
//!
//! ```text
//!   Thread 1        Thread 2        Thread 3
//!      │ get(a)        │ put(b)        │ remove(c)
//!      ▼               ▼               ▼
//!   ┌──────────────────────────────────────────┐
//!   │     Arc<Mutex<LruCache<K, V>>>           │
//!   │     one holder at a time                 │
//!   └──────────────────────────────────────────┘
//! ```
//!
//! Values come back by clone because references cannot outlive the guard.
//! Use [`with_lock`](ConcurrentLruCache::with_lock) for compound operations
//! that must observe one consistent state.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ConfigError;
use crate::policy::lru::LruCache;

/// Cloneable, shareable LRU cache guarded by a single mutex.
pub struct ConcurrentLruCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
}

impl<K, V> Clone for ConcurrentLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a shared cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        LruCache::try_new(capacity).map(Self::from_cache)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    pub fn put_evicting(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().put_evicting(key, value)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.inner.lock().remove(key)
    }

    pub fn take(&self, key: &K) -> Option<V> {
        self.inner.lock().take(key)
    }

    /// Marks `key` as most recently used; `false` if absent.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Like [`with_lock`](Self::with_lock), but gives up instead of blocking.
    pub fn try_with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> Option<R> {
        let mut guard = self.inner.try_lock()?;
        Some(f(&mut guard))
    }
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Clones the value for `key` and promotes it to most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Clones the value for `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    pub fn peek_lru(&self) -> Option<(K, V)> {
        self.inner
            .lock()
            .peek_lru()
            .map(|(key, value)| (key.clone(), value.clone()))
    }
}

impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f
                .debug_struct("ConcurrentLruCache")
                .field("len", &cache.len())
                .field("capacity", &cache.capacity())
                .finish(),
            None => f
                .debug_struct("ConcurrentLruCache")
                .field("locked", &true)
                .finish_non_exhaustive(),
        }
    }
}
