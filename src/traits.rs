//! # Cache Trait Hierarchy
//!
//! Policy-agnostic seams over the LRU cache. Generic code (the admission
//! front in [`crate::admission`], benchmarks, callers that want to swap
//! implementations) programs against these instead of the concrete type.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len(&) → usize                         │
//!   │  is_empty(&) → bool                     │
//!   │  capacity(&) → usize                    │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K])                     │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LruCacheTrait<K, V>            │
//!   │                                         │
//!   │  pop_lru() → (K, V)                     │
//!   │  peek_lru() → (&K, &V)                  │
//!   │  touch(&K) → bool                       │
//!   │  recency_rank(&K) → usize               │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! None of these traits require `Send` or `Sync`. Implementations mutate on
//! every `get`, so shared use needs one lock around the whole cache; see
//! `ConcurrentLruCache` behind the `concurrency` feature.

/// Operations every cache supports.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::CoreCache;
///
/// fn warm<C: CoreCache<u32, String>>(cache: &mut C, items: &[(u32, String)]) {
///     for (key, value) in items {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::try_new(8).unwrap();
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(CoreCache::len(&cache), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is full and `key` is new, one entry is evicted first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, updating recency on a hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating recency.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Caches that support removal of arbitrary keys.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in order and collects the results.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    /// use lrukit::traits::{CoreCache, MutableCache};
    ///
    /// let mut cache = LruCache::try_new(4).unwrap();
    /// cache.insert(1, "a");
    /// cache.insert(2, "b");
    ///
    /// let removed = cache.remove_batch(&[1, 3, 2]);
    /// assert_eq!(removed, vec![Some("a"), None, Some("b")]);
    /// assert!(CoreCache::is_empty(&cache));
    /// ```
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Recency-ordered operations.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::{CoreCache, LruCacheTrait};
///
/// let mut cache = LruCache::try_new(3).unwrap();
/// cache.insert(1, "first");
/// cache.insert(2, "second");
///
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(1));
/// assert!(LruCacheTrait::touch(&mut cache, &1));
/// assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(2));
///
/// assert_eq!(LruCacheTrait::recency_rank(&cache, &1), Some(0));
/// assert_eq!(cache.pop_lru(), Some((2, "second")));
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Peeks at the least recently used entry without changing order.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of `key` in recency order (0 = most recent). O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
