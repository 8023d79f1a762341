//! # Least Recently Used (LRU) Cache
//!
//! Fixed-capacity key-value cache that discards the entry gone longest
//! unused whenever a new key would exceed capacity.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           LruCache<K, V>                             │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  KeyIndex<K>  (FxHashMap<K, SlotId>)                         │   │
//!   │   │                                                              │   │
//!   │   │   "a" ──► id_0      "b" ──► id_2      "c" ──► id_1           │   │
//!   │   └──────────────────────────┬───────────────────────────────────┘   │
//!   │                              │ SlotId                                │
//!   │                              ▼                                       │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  EntryStore<K, V>  (SlotArena<Entry<K, V>>)                  │   │
//!   │   │                                                              │   │
//!   │   │   id_0: { "a", va, prev, next }                              │   │
//!   │   │   id_1: { "c", vc, prev, next }                              │   │
//!   │   │   id_2: { "b", vb, prev, next }                              │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                              ▲                                       │
//!   │                              │ rewires prev/next only                │
//!   │   ┌──────────────────────────┴───────────────────────────────────┐   │
//!   │   │  OrderList { head, tail, len }                               │   │
//!   │   │                                                              │   │
//!   │   │   head ──► [id_1] ◄──► [id_2] ◄──► [id_0] ◄── tail           │   │
//!   │   │    (MRU)                              (LRU)                  │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is the only owner of entries. The list and the index hold
//! `Copy` handles, so there are no raw pointers and no reference cycles.
//!
//! ## Operations Flow
//!
//! ```text
//!   PUT new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════
//!     head ──► [C] ◄──► [B] ◄──► [A] ◄── tail
//!
//!   put(D):
//!     1. pop_back → A; drop "A" from the index; free A's slot
//!     2. allocate D; push_front; index "D"
//!
//!     head ──► [D] ◄──► [C] ◄──► [B] ◄── tail
//!
//!   PUT existing key
//!   ═══════════════════════════════════════════════════════════════════
//!   put(B, v'):  overwrite in place, move_to_front. No eviction, same slot.
//!
//!     head ──► [B] ◄──► [D] ◄──► [C] ◄── tail
//!
//!   GET
//!   ═══════════════════════════════════════════════════════════════════
//!   get(C):  index lookup, move_to_front, return &value.
//!
//!     head ──► [C] ◄──► [B] ◄──► [D] ◄── tail
//! ```
//!
//! ## Methods
//!
//! | Method              | Complexity | Description                               |
//! |---------------------|------------|-------------------------------------------|
//! | `try_new(capacity)` | O(1)       | Validated constructor, rejects 0          |
//! | `new(NonZeroUsize)` | O(1)       | Infallible constructor                    |
//! | `get(&k)`           | O(1)       | Lookup, promotes to MRU                   |
//! | `get_mut(&k)`       | O(1)       | Mutable lookup, promotes to MRU           |
//! | `peek(&k)`          | O(1)       | Lookup without promotion                  |
//! | `put(k, v)`         | O(1)       | Insert or update, may evict one entry     |
//! | `put_evicting(k, v)`| O(1)       | Like `put`, returns the evicted entry     |
//! | `remove(&k)`        | O(1)       | Remove, `true` if present                 |
//! | `take(&k)`          | O(1)       | Remove and return the value               |
//! | `pop_lru()`         | O(1)       | Remove the LRU entry                      |
//! | `peek_lru()`        | O(1)       | LRU entry without removal                 |
//! | `touch(&k)`         | O(1)       | Promote without reading                   |
//! | `recency_rank(&k)`  | O(n)       | Position in recency order (0 = MRU)       |
//! | `iter()`            | O(n)       | Entries MRU → LRU                         |
//! | `check_invariants()`| O(n)       | Cross-check index, list and store         |
//!
//! ## Thread Safety
//!
//! `LruCache` has no internal locking. `get` reorders the list, so even
//! reads need exclusive access. Callers sharing a cache hold one lock around
//! the whole value (see `ConcurrentLruCache` with the `concurrency`
//! feature); interleaving a promotion with an eviction under finer locks
//! would let the index and the list drift apart.
//!
//! ## Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let mut cache = LruCache::try_new(2).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//!
//! // "a" becomes most recently used
//! assert_eq!(cache.get("a"), Some(&1));
//!
//! // "b" is now the LRU entry and makes room for "c"
//! cache.put("c", 3);
//! assert!(!cache.contains("b"));
//! assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["c", "a"]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use log::{debug, trace};

use crate::ds::{EntryStore, KeyIndex, OrderIter, OrderList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Fixed-capacity LRU cache.
pub struct LruCache<K, V> {
    index: KeyIndex<K>,
    entries: EntryStore<K, V>,
    order: OrderList,
    capacity: usize,
}

enum Upsert<K, V> {
    Updated(Option<V>),
    Inserted { evicted: Option<(K, V)> },
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::try_new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(LruCache::<u32, String>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| ConfigError::new("capacity must be greater than zero"))?;
        Ok(Self::new(capacity))
    }

    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        debug!("creating lru cache with capacity {capacity}");
        Self {
            index: KeyIndex::with_capacity(capacity),
            entries: EntryStore::with_capacity(capacity),
            order: OrderList::new(),
            capacity,
        }
    }

    /// Number of live entries. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is cached. Does not change recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains(key)
    }

    /// Looks up `key` and, on a hit, makes it the most recently used entry.
    ///
    /// A miss leaves the cache untouched.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = self.promote(key)?;
        self.entries.value(id)
    }

    /// Mutable variant of [`get`](Self::get); also promotes on a hit.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = self.promote(key)?;
        self.entries.value_mut(id)
    }

    /// Looks up `key` without changing recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(key).and_then(|id| self.entries.value(id))
    }

    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// Updating an existing key overwrites the value in place and returns the
    /// previous one; size is unchanged and nothing is evicted. Inserting a new
    /// key into a full cache first evicts exactly one entry, the LRU one.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::try_new(1).unwrap();
    /// assert_eq!(cache.put("a", 1), None);
    /// assert_eq!(cache.put("a", 2), Some(1));
    /// assert_eq!(cache.put("b", 3), None); // evicts "a"
    /// assert_eq!(cache.len(), 1);
    /// assert!(!cache.contains("a"));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.upsert(key, value) {
            Upsert::Updated(previous) => previous,
            Upsert::Inserted { .. } => None,
        }
    }

    /// Like [`put`](Self::put), but returns the entry evicted to make room.
    ///
    /// Updates never evict, so they return `None` and drop the old value.
    pub fn put_evicting(&mut self, key: K, value: V) -> Option<(K, V)> {
        match self.upsert(key, value) {
            Upsert::Updated(_) => None,
            Upsert::Inserted { evicted } => evicted,
        }
    }

    /// Removes `key`; returns `true` if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes `key` and returns its value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.order.unlink(&mut self.entries, id);
        let (_, value) = self.entries.free(id)?;
        trace!("removed entry from slot {} (len {})", id.index(), self.len());
        self.debug_check_sizes();
        Some(value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let evicted = self.evict_lru();
        self.debug_check_sizes();
        evicted
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.back().and_then(|id| self.entries.pair(id))
    }

    /// Returns the most recently used entry without changing order.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.order.front().and_then(|id| self.entries.pair(id))
    }

    /// Marks `key` as most recently used; `false` if absent.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.promote(key).is_some()
    }

    /// Position of `key` in recency order, 0 being the most recent. O(n).
    pub fn recency_rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let target = self.index.get(key)?;
        self.order.iter(&self.entries).position(|id| id == target)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: &self.entries,
            ids: self.order.iter(&self.entries),
        }
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Drops every entry. Capacity is kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.entries.clear();
    }

    /// Cross-checks the index, the recency list and the store. O(n).
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] naming the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.index.len();
        if self.entries.len() != len || self.order.len() != len {
            return Err(InvariantError::new(format!(
                "size mismatch: index {len}, store {}, list {}",
                self.entries.len(),
                self.order.len()
            )));
        }
        if len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {len} exceeds capacity {}",
                self.capacity
            )));
        }
        if len == 0 {
            if self.order.front().is_some() || self.order.back().is_some() {
                return Err(InvariantError::new("empty cache has a head or tail"));
            }
            return Ok(());
        }

        let mut walked = 0usize;
        let mut prev: Option<SlotId> = None;
        let mut current = self.order.front();
        while let Some(id) = current {
            let entry = self
                .entries
                .entry(id)
                .ok_or_else(|| InvariantError::new(format!("slot {} is vacant", id.index())))?;
            if !entry.linked {
                return Err(InvariantError::new(format!(
                    "slot {} reachable but not flagged linked",
                    id.index()
                )));
            }
            if entry.prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {} has a broken back link",
                    id.index()
                )));
            }
            if self.index.get(&entry.key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "slot {} is not the indexed entry for its key",
                    id.index()
                )));
            }
            walked += 1;
            if walked > len {
                return Err(InvariantError::new("cycle in recency list"));
            }
            prev = Some(id);
            current = entry.next;
        }

        if walked != len {
            return Err(InvariantError::new(format!(
                "walked {walked} entries, expected {len}"
            )));
        }
        if self.order.back() != prev {
            return Err(InvariantError::new("tail is not the last reachable entry"));
        }
        Ok(())
    }

    fn promote<Q>(&mut self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order.move_to_front(&mut self.entries, id);
        Some(id)
    }

    fn upsert(&mut self, key: K, value: V) -> Upsert<K, V> {
        if let Some(id) = self.index.get(&key) {
            let previous = self.entries.set_value(id, value);
            self.order.move_to_front(&mut self.entries, id);
            return Upsert::Updated(previous);
        }

        let evicted = if self.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let id = self.entries.allocate(key.clone(), value);
        self.order.push_front(&mut self.entries, id);
        self.index.insert(key, id);
        self.debug_check_sizes();

        Upsert::Inserted { evicted }
    }

    /// Unlinks the tail, drops its key from the index and frees the entry.
    fn evict_lru(&mut self) -> Option<(K, V)> {
        if self.order.is_empty() {
            return None;
        }
        let id = self.order.pop_back(&mut self.entries)?;
        if let Some(key) = self.entries.key(id) {
            self.index.remove(key);
        }
        debug_assert!(!self.entries.is_linked(id));
        let evicted = self.entries.free(id);
        trace!("evicted lru entry from slot {} (len {})", id.index(), self.len());
        evicted
    }

    #[inline]
    fn debug_check_sizes(&self) {
        debug_assert_eq!(self.index.len(), self.order.len());
        debug_assert_eq!(self.index.len(), self.entries.len());
        debug_assert!(self.index.len() <= self.capacity);
    }
}

/// Iterator over `(&K, &V)` from most to least recently used.
pub struct Iter<'a, K, V> {
    entries: &'a EntryStore<K, V>,
    ids: OrderIter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        self.entries.pair(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        LruCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        LruCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        self.take(key)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruCache::pop_lru(self)
    }

    #[inline]
    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCache::peek_lru(self)
    }

    #[inline]
    fn touch(&mut self, key: &K) -> bool {
        LruCache::touch(self, key)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruCache::recency_rank(self, key)
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache<K: Eq + Hash + Clone, V>(capacity: usize) -> LruCache<K, V> {
        LruCache::try_new(capacity).unwrap()
    }

    fn order<K: Eq + Hash + Clone, V>(cache: &LruCache<K, V>) -> Vec<K> {
        cache.keys().cloned().collect()
    }

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        mod basic_behavior {
            use super::*;

            #[test]
            fn test_new_cache_creation() {
                let c1: LruCache<i32, i32> = cache(1);
                assert_eq!(c1.capacity(), 1);
                assert_eq!(c1.len(), 0);
                assert!(c1.is_empty());

                let c2: LruCache<i32, i32> = LruCache::new(NonZeroUsize::new(1000).unwrap());
                assert_eq!(c2.capacity(), 1000);
                assert!(c2.check_invariants().is_ok());
            }

            #[test]
            fn test_zero_capacity_rejected() {
                let err = LruCache::<i32, i32>::try_new(0).unwrap_err();
                assert!(err.message().contains("capacity"));
            }

            #[test]
            fn test_get_existing_and_missing() {
                let mut c = cache(4);
                c.put("a", 1);
                assert_eq!(c.get("a"), Some(&1));
                assert_eq!(c.get("missing"), None);
                assert_eq!(c.len(), 1);
            }

            #[test]
            fn test_miss_does_not_reorder() {
                let mut c = cache(3);
                c.put(1, "one");
                c.put(2, "two");
                let before = order(&c);
                assert_eq!(c.get(&99), None);
                assert_eq!(order(&c), before);
            }

            #[test]
            fn test_put_returns_previous_value() {
                let mut c = cache(2);
                assert_eq!(c.put("a", 1), None);
                assert_eq!(c.put("a", 2), Some(1));
                assert_eq!(c.peek("a"), Some(&2));
                assert_eq!(c.len(), 1);
            }

            #[test]
            fn test_get_mut_updates_and_promotes() {
                let mut c = cache(2);
                c.put("a", 1);
                c.put("b", 2);
                if let Some(v) = c.get_mut("a") {
                    *v = 10;
                }
                assert_eq!(order(&c), vec!["a", "b"]);
                assert_eq!(c.peek("a"), Some(&10));
            }

            #[test]
            fn test_string_keys_borrow_as_str() {
                let mut c: LruCache<String, u32> = cache(2);
                c.put("alpha".to_string(), 1);
                assert_eq!(c.get("alpha"), Some(&1));
                assert!(c.contains("alpha"));
                assert!(c.remove("alpha"));
                assert!(c.is_empty());
            }

            #[test]
            fn test_debug_output() {
                let mut c = cache(3);
                c.put(1u8, 1u8);
                let dbg = format!("{c:?}");
                assert!(dbg.contains("LruCache"));
                assert!(dbg.contains("len: 1"));
                assert!(dbg.contains("capacity: 3"));
            }
        }

        mod eviction {
            use super::*;

            #[test]
            fn test_evicts_least_recently_inserted() {
                let mut c = cache(2);
                c.put("a", 1);
                c.put("b", 2);
                c.put("c", 3);
                assert_eq!(order(&c), vec!["c", "b"]);
                assert!(!c.contains("a"));
            }

            #[test]
            fn test_get_protects_from_eviction() {
                let mut c = cache(2);
                c.put("a", 1);
                c.put("b", 2);
                c.get("a");
                c.put("c", 3);
                assert_eq!(order(&c), vec!["c", "a"]);
            }

            #[test]
            fn test_update_never_evicts() {
                let mut c = cache(2);
                c.put("a", 1);
                c.put("b", 2);
                for i in 0..10 {
                    c.put("a", i);
                    c.put("b", i);
                }
                assert_eq!(c.len(), 2);
                assert_eq!(order(&c), vec!["b", "a"]);
            }

            #[test]
            fn test_put_evicting_reports_victim() {
                let mut c = cache(2);
                assert_eq!(c.put_evicting("a", 1), None);
                assert_eq!(c.put_evicting("b", 2), None);
                assert_eq!(c.put_evicting("a", 3), None);
                assert_eq!(c.put_evicting("c", 4), Some(("b", 2)));
                assert_eq!(c.put_evicting("d", 5), Some(("a", 3)));
            }

            #[test]
            fn test_one_eviction_per_put() {
                let mut c = cache(3);
                for i in 0..3 {
                    c.put(i, i);
                }
                c.put(10, 10);
                assert_eq!(c.len(), 3);
                assert_eq!(order(&c), vec![10, 2, 1]);
            }

            #[test]
            fn test_capacity_one() {
                let mut c = cache(1);
                c.put("a", 1);
                c.put("a", 2);
                assert_eq!(c.peek("a"), Some(&2));
                assert_eq!(c.put_evicting("b", 3), Some(("a", 2)));
                assert_eq!(order(&c), vec!["b"]);
                assert!(c.check_invariants().is_ok());
            }

            #[test]
            fn test_pop_lru_until_empty() {
                let mut c = cache(3);
                c.put(1, 'a');
                c.put(2, 'b');
                c.put(3, 'c');
                c.get(&1);
                assert_eq!(c.pop_lru(), Some((2, 'b')));
                assert_eq!(c.pop_lru(), Some((3, 'c')));
                assert_eq!(c.pop_lru(), Some((1, 'a')));
                assert_eq!(c.pop_lru(), None);
                assert!(c.check_invariants().is_ok());
            }

            #[test]
            fn test_peek_lru_and_mru() {
                let mut c = cache(3);
                assert_eq!(c.peek_lru(), None);
                c.put(1, 10);
                c.put(2, 20);
                assert_eq!(c.peek_lru(), Some((&1, &10)));
                assert_eq!(c.peek_mru(), Some((&2, &20)));
                // peeking never reorders
                assert_eq!(c.peek(&1), Some(&10));
                assert_eq!(c.peek_lru(), Some((&1, &10)));
            }
        }

        mod removal {
            use super::*;

            #[test]
            fn test_remove_existing_and_missing() {
                let mut c = cache(3);
                c.put("a", 1);
                assert!(c.remove("a"));
                assert!(!c.remove("a"));
                assert!(!c.remove("never"));
                assert!(c.is_empty());
                assert!(c.check_invariants().is_ok());
            }

            #[test]
            fn test_remove_head_middle_tail() {
                let mut c = cache(5);
                for k in ["a", "b", "c", "d", "e"] {
                    c.put(k, ());
                }
                // order: e d c b a
                assert!(c.remove("c"));
                assert_eq!(order(&c), vec!["e", "d", "b", "a"]);
                assert!(c.remove("e"));
                assert_eq!(order(&c), vec!["d", "b", "a"]);
                assert!(c.remove("a"));
                assert_eq!(order(&c), vec!["d", "b"]);
                assert!(c.check_invariants().is_ok());
            }

            #[test]
            fn test_remove_frees_room_without_eviction() {
                let mut c = cache(2);
                c.put("a", 1);
                c.put("b", 2);
                assert_eq!(c.take("a"), Some(1));
                assert_eq!(c.put_evicting("c", 3), None);
                assert_eq!(order(&c), vec!["c", "b"]);
            }

            #[test]
            fn test_remove_sole_entry_resets_list() {
                let mut c = cache(1);
                c.put("x", 0);
                assert!(c.remove("x"));
                assert_eq!(c.peek_lru(), None);
                assert_eq!(c.peek_mru(), None);
                c.put("y", 1);
                assert_eq!(order(&c), vec!["y"]);
                assert!(c.check_invariants().is_ok());
            }

            #[test]
            fn test_clear_then_reuse() {
                let mut c = cache(2);
                c.put(1, 1);
                c.put(2, 2);
                c.clear();
                assert!(c.is_empty());
                assert_eq!(c.capacity(), 2);
                assert!(c.check_invariants().is_ok());
                c.put(3, 3);
                assert_eq!(order(&c), vec![3]);
            }
        }

        mod recency {
            use super::*;

            #[test]
            fn test_recency_rank() {
                let mut c = cache(3);
                c.put(1, ());
                c.put(2, ());
                c.put(3, ());
                assert_eq!(c.recency_rank(&3), Some(0));
                assert_eq!(c.recency_rank(&1), Some(2));
                c.touch(&1);
                assert_eq!(c.recency_rank(&1), Some(0));
                assert_eq!(c.recency_rank(&3), Some(1));
                assert_eq!(c.recency_rank(&99), None);
            }

            #[test]
            fn test_touch_missing_is_false() {
                let mut c: LruCache<i32, i32> = cache(2);
                assert!(!c.touch(&1));
            }

            #[test]
            fn test_repeated_get_on_head_is_stable() {
                let mut c = cache(3);
                c.put("a", 1);
                c.put("b", 2);
                c.get("a");
                let after_first = order(&c);
                for _ in 0..5 {
                    assert_eq!(c.get("a"), Some(&1));
                    assert_eq!(order(&c), after_first);
                }
            }

            #[test]
            fn test_update_keeps_entry_identity() {
                let mut c = cache(3);
                c.put("a", 1);
                c.put("b", 2);
                let slot = c.index.get("a").unwrap();
                c.put("a", 3);
                assert_eq!(c.index.get("a"), Some(slot));
                assert_eq!(c.order.front(), Some(slot));
            }

            #[test]
            fn test_iter_is_mru_to_lru() {
                let mut c = cache(3);
                c.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
                c.get(&2);
                let pairs: Vec<_> = c.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(pairs, vec![(2, 'b'), (3, 'c'), (1, 'a')]);
                assert_eq!(c.iter().size_hint(), (3, Some(3)));
                assert_eq!((&c).into_iter().count(), 3);
            }
        }

        mod traits {
            use super::*;

            #[test]
            fn test_core_cache_delegates() {
                let mut c: LruCache<u32, u32> = cache(2);
                assert_eq!(CoreCache::insert(&mut c, 1, 10), None);
                assert_eq!(CoreCache::insert(&mut c, 1, 11), Some(10));
                assert_eq!(CoreCache::get(&mut c, &1), Some(&11));
                assert!(CoreCache::contains(&c, &1));
                assert_eq!(CoreCache::len(&c), 1);
                assert_eq!(CoreCache::capacity(&c), 2);
                CoreCache::clear(&mut c);
                assert!(CoreCache::is_empty(&c));
            }

            #[test]
            fn test_mutable_and_lru_traits() {
                let mut c: LruCache<u32, u32> = cache(3);
                c.extend([(1, 1), (2, 2), (3, 3)]);
                assert_eq!(MutableCache::remove(&mut c, &2), Some(2));
                assert_eq!(LruCacheTrait::peek_lru(&c), Some((&1, &1)));
                assert!(LruCacheTrait::touch(&mut c, &1));
                assert_eq!(LruCacheTrait::recency_rank(&c, &3), Some(1));
                assert_eq!(LruCacheTrait::pop_lru(&mut c), Some((3, 3)));
            }
        }
    }

    // ==============================================
    // STATE CONSISTENCY TESTS MODULE
    // ==============================================
    mod state_consistency {
        use std::collections::HashSet;

        use super::*;

        #[test]
        fn test_index_list_store_agree_after_every_operation() {
            let mut c = cache(4);
            c.check_invariants().unwrap();

            for i in 0..4 {
                c.put(i, i);
                c.check_invariants().unwrap();
            }
            c.get(&0);
            c.check_invariants().unwrap();
            c.put(4, 4);
            c.check_invariants().unwrap();
            c.remove(&2);
            c.check_invariants().unwrap();
            c.put(0, 100);
            c.check_invariants().unwrap();
            c.pop_lru();
            c.check_invariants().unwrap();
            c.clear();
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_list_keys_match_index_keys() {
            let mut c = cache(8);
            for i in 0..12 {
                c.put(i, i * 2);
                if i % 3 == 0 {
                    c.get(&(i / 2));
                }
            }
            let listed: HashSet<_> = c.keys().copied().collect();
            let indexed: HashSet<_> = c.index.iter().map(|(k, _)| *k).collect();
            assert_eq!(listed.len(), c.len());
            assert_eq!(listed, indexed);
        }

        #[test]
        fn test_component_validators_pass() {
            let mut c = cache(3);
            c.extend([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
            c.remove("c");
            c.order.debug_validate_invariants(&c.entries);
        }

        #[test]
        fn test_slots_are_recycled_under_churn() {
            let mut c = cache(4);
            for i in 0..1_000u32 {
                c.put(i, i);
            }
            assert_eq!(c.len(), 4);
            assert_eq!(order(&c), vec![999, 998, 997, 996]);
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_check_invariants_detects_drift() {
            let mut c = cache(3);
            c.put("a", 1);
            c.put("b", 2);
            // simulate a half-applied removal
            c.index.remove("a");
            let err = c.check_invariants().unwrap_err();
            assert!(err.message().contains("size mismatch"));
        }
    }
}
