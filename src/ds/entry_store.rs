//! Entry storage for the LRU cache.
//!
//! Owns every cached `(key, value)` pair together with its recency-list
//! links. The [`OrderList`](crate::ds::OrderList) only rewires the `prev` /
//! `next` handles stored here; it never allocates or frees. Entries are
//! created by [`allocate`](EntryStore::allocate) and destroyed by
//! [`free`](EntryStore::free), nothing else.
//!
//! ```text
//!   SlotArena<Entry<K, V>>
//!   ┌────────┬──────────────────────────────────────────────────────┐
//!   │ SlotId │ Entry { key, value, prev, next, linked }             │
//!   ├────────┼──────────────────────────────────────────────────────┤
//!   │ id_0   │ { "a", 1, prev: None,       next: Some(id_2), true } │
//!   │ id_1   │ (vacant, on the free list)                           │
//!   │ id_2   │ { "c", 3, prev: Some(id_0), next: None,       true } │
//!   └────────┴──────────────────────────────────────────────────────┘
//! ```

use crate::ds::slot_arena::{SlotArena, SlotId};

/// One cached mapping plus its position in the recency list.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<SlotId>,
    pub(crate) next: Option<SlotId>,
    /// Set while the entry is reachable from the list head. A sole element has
    /// no neighbours, so the links alone cannot tell linked from detached.
    pub(crate) linked: bool,
}

/// Arena-backed owner of cache entries.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    arena: SlotArena<Entry<K, V>>,
}

impl<K, V> EntryStore<K, V> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
        }
    }

    /// Creates a detached entry and returns its handle.
    pub fn allocate(&mut self, key: K, value: V) -> SlotId {
        self.arena.insert(Entry {
            key,
            value,
            prev: None,
            next: None,
            linked: false,
        })
    }

    /// Destroys an entry and hands back its key and value.
    ///
    /// The entry must already be unlinked from the recency list; freeing a
    /// linked entry would leave its neighbours pointing at a recycled slot.
    pub fn free(&mut self, id: SlotId) -> Option<(K, V)> {
        debug_assert!(
            self.arena.get(id).is_none_or(|entry| !entry.linked),
            "freeing entry {id:?} while it is still linked"
        );
        self.arena.remove(id).map(|entry| (entry.key, entry.value))
    }

    pub fn key(&self, id: SlotId) -> Option<&K> {
        self.arena.get(id).map(|entry| &entry.key)
    }

    pub fn value(&self, id: SlotId) -> Option<&V> {
        self.arena.get(id).map(|entry| &entry.value)
    }

    pub fn value_mut(&mut self, id: SlotId) -> Option<&mut V> {
        self.arena.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns `(key, value)` for a live entry.
    pub fn pair(&self, id: SlotId) -> Option<(&K, &V)> {
        self.arena.get(id).map(|entry| (&entry.key, &entry.value))
    }

    /// Replaces the payload in place, returning the previous value.
    ///
    /// The entry keeps its handle and its list position.
    pub fn set_value(&mut self, id: SlotId, value: V) -> Option<V> {
        self.arena
            .get_mut(id)
            .map(|entry| std::mem::replace(&mut entry.value, value))
    }

    /// Returns `(prev, next)` for a live entry.
    pub fn links(&self, id: SlotId) -> Option<(Option<SlotId>, Option<SlotId>)> {
        self.arena.get(id).map(|entry| (entry.prev, entry.next))
    }

    pub fn is_linked(&self, id: SlotId) -> bool {
        self.arena.get(id).is_some_and(|entry| entry.linked)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }

    pub(crate) fn entry(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.arena.get(id)
    }

    pub(crate) fn entry_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.arena.get_mut(id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotId, &Entry<K, V>)> {
        self.arena.iter()
    }
}

impl<K, V> Default for EntryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
