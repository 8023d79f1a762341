#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::{EntryStore, OrderList, SlotId};

// Fuzz arbitrary operation sequences on OrderList over an EntryStore
//
// Tests random sequences of allocate, push_front, unlink, move_to_front,
// pop_back and free, including operations on stale or detached handles.
fuzz_target!(|data: &[u8]| {
    let mut store: EntryStore<u32, u32> = EntryStore::new();
    let mut list = OrderList::new();
    let mut ids: Vec<SlotId> = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 6;
        let pick = usize::from(pair[1]);
        let chosen = (!ids.is_empty()).then(|| ids[pick % ids.len()]);

        match op {
            0 => {
                // allocate + push_front
                let id = store.allocate(u32::from(pair[1]), 0);
                ids.push(id);
                assert!(list.push_front(&mut store, id));
                assert_eq!(list.front(), Some(id));
            }
            1 => {
                // push_front on an arbitrary handle
                if let Some(id) = chosen {
                    let expected = store.contains(id) && !store.is_linked(id);
                    assert_eq!(list.push_front(&mut store, id), expected);
                }
            }
            2 => {
                // unlink
                if let Some(id) = chosen {
                    let old_len = list.len();
                    if list.unlink(&mut store, id) {
                        assert_eq!(list.len(), old_len - 1);
                        assert!(!store.is_linked(id));
                    }
                }
            }
            3 => {
                // move_to_front
                if let Some(id) = chosen
                    && list.move_to_front(&mut store, id)
                {
                    assert_eq!(list.front(), Some(id));
                }
            }
            4 => {
                // pop_back then free
                let expected = list.back();
                let popped = list.pop_back(&mut store);
                assert_eq!(popped, expected);
                if let Some(id) = popped {
                    assert!(store.free(id).is_some());
                    ids.retain(|&other| other != id);
                }
            }
            5 => {
                // free a detached entry
                if let Some(id) = chosen
                    && store.contains(id)
                    && !store.is_linked(id)
                {
                    assert!(store.free(id).is_some());
                    ids.retain(|&other| other != id);
                }
            }
            _ => unreachable!(),
        }

        assert!(list.len() <= store.len());
        list.debug_validate_invariants(&store);
    }
});
