#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::SlotArena;

// Fuzz arbitrary operation sequences on SlotArena
//
// Tests random sequences of insert, remove, get_mut and clear, checking
// that freed slots are recycled before the arena grows.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 4;
        let value = u32::from(pair[1]);

        match op {
            0 => {
                // insert
                let had_free_slot = arena.len() < arena.slot_count();
                let old_slots = arena.slot_count();
                let id = arena.insert(value);
                ids.push(id);

                assert_eq!(arena.get(id), Some(&value));
                if had_free_slot {
                    assert_eq!(arena.slot_count(), old_slots);
                }
            }
            1 => {
                // remove
                if !ids.is_empty() {
                    let id = ids.swap_remove(value as usize % ids.len());
                    let old_len = arena.len();
                    assert!(arena.remove(id).is_some());
                    assert_eq!(arena.len(), old_len - 1);
                    assert!(!arena.contains(id));
                }
            }
            2 => {
                // get_mut
                if !ids.is_empty() {
                    let id = ids[value as usize % ids.len()];
                    if let Some(slot) = arena.get_mut(id) {
                        *slot = slot.wrapping_add(1);
                    }
                }
            }
            3 => {
                // clear (rarely)
                if value == 0 {
                    arena.clear();
                    ids.clear();
                    assert!(arena.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(arena.len(), ids.len());
        arena.debug_validate_invariants();
    }
});
