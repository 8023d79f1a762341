//! Key → entry handle lookup.
//!
//! A thin wrapper over `FxHashMap<K, SlotId>` so the cache facade resolves
//! keys in O(1) without walking the recency list. The index carries no
//! ordering; recency lives in [`OrderList`](crate::ds::OrderList).

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
pub struct KeyIndex<K> {
    map: FxHashMap<K, SlotId>,
}

impl<K> KeyIndex<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Maps `key` to `id`, returning the handle it replaced.
    pub fn insert(&mut self, key: K, id: SlotId) -> Option<SlotId> {
        self.map.insert(key, id)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.remove(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, SlotId)> {
        self.map.iter().map(|(key, &id)| (key, id))
    }
}

impl<K> Default for KeyIndex<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
