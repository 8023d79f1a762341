//! Recency order over entries in an [`EntryStore`].
//!
//! The list itself only remembers `head`, `tail` and its length; the
//! `prev` / `next` handles live on the entries. Every operation takes the
//! store it threads through, so the list never owns a node and linking
//! never creates an ownership cycle.
//!
//! ```text
//!   head ─► [id_3] ◄──► [id_0] ◄──► [id_5] ◄── tail
//!            MRU                      LRU
//! ```
//!
//! ## Operations
//! - `push_front(id)`: attach a detached entry as the new head
//! - `unlink(id)`: detach from any position, repairing neighbours
//! - `move_to_front(id)`: `unlink` + `push_front`; no-op when already head
//! - `pop_back()`: detach and return the tail handle
//!
//! All of the above are O(1). `debug_validate_invariants()` walks the whole
//! list and is available in debug/test builds.

use crate::ds::entry_store::EntryStore;
use crate::ds::slot_arena::SlotId;

/// Doubly linked recency list threaded through an [`EntryStore`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderList {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl OrderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used entry.
    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently used entry.
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links a detached entry in as the new head.
    ///
    /// Returns `false` (and changes nothing) if `id` is not live or is
    /// already linked.
    pub fn push_front<K, V>(&mut self, store: &mut EntryStore<K, V>, id: SlotId) -> bool {
        let old_head = self.head;
        match store.entry_mut(id) {
            Some(entry) if !entry.linked => {
                entry.prev = None;
                entry.next = old_head;
                entry.linked = true;
            },
            _ => return false,
        }

        match old_head.and_then(|head| store.entry_mut(head)) {
            Some(head_entry) => head_entry.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        true
    }

    /// Detaches `id` from wherever it sits. The entry stays in the store.
    ///
    /// Returns `false` if `id` is not linked into this list.
    pub fn unlink<K, V>(&mut self, store: &mut EntryStore<K, V>, id: SlotId) -> bool {
        let (prev, next) = match store.entry(id) {
            Some(entry) if entry.linked => (entry.prev, entry.next),
            _ => return false,
        };

        match prev.and_then(|prev_id| store.entry_mut(prev_id)) {
            Some(prev_entry) => prev_entry.next = next,
            None => self.head = next,
        }
        match next.and_then(|next_id| store.entry_mut(next_id)) {
            Some(next_entry) => next_entry.prev = prev,
            None => self.tail = prev,
        }

        if let Some(entry) = store.entry_mut(id) {
            entry.prev = None;
            entry.next = None;
            entry.linked = false;
        }
        self.len -= 1;
        true
    }

    /// Promotes `id` to head. Already at head is a no-op with no link writes.
    pub fn move_to_front<K, V>(&mut self, store: &mut EntryStore<K, V>, id: SlotId) -> bool {
        if self.head == Some(id) {
            return true;
        }
        self.unlink(store, id) && self.push_front(store, id)
    }

    /// Detaches the tail and returns its handle; `None` on an empty list.
    pub fn pop_back<K, V>(&mut self, store: &mut EntryStore<K, V>) -> Option<SlotId> {
        let id = self.tail?;
        self.unlink(store, id);
        Some(id)
    }

    /// Forgets every link. Entries are not touched; callers clear the store.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates handles from head (MRU) to tail (LRU).
    pub fn iter<'a, K, V>(&self, store: &'a EntryStore<K, V>) -> OrderIter<'a, K, V> {
        OrderIter {
            store,
            current: self.head,
            remaining: self.len,
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants<K, V>(&self, store: &EntryStore<K, V>) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let entry = store.entry(id).expect("linked entry missing from store");
            assert!(entry.linked, "reachable entry not flagged as linked");
            assert_eq!(entry.prev, prev);
            if entry.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = entry.next;
            count += 1;
            assert!(count <= self.len, "cycle in recency list");
        }
        assert_eq!(count, self.len);

        let flagged = store.iter().filter(|(_, entry)| entry.linked).count();
        assert_eq!(flagged, self.len);
    }
}

/// Iterator over handles from MRU to LRU.
pub struct OrderIter<'a, K, V> {
    store: &'a EntryStore<K, V>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<K, V> Iterator for OrderIter<'_, K, V> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.store.entry(id).and_then(|entry| entry.next);
        self.remaining = self.remaining.saturating_sub(1);
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
