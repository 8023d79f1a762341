#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru::LruCache;

// Fuzz arbitrary operation sequences on LruCache
//
// First byte picks the capacity; the rest is (op, key) pairs driving
// put, get, peek, remove, take, touch, pop_lru and clear.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 16) + 1;
    let Ok(mut cache) = LruCache::<u8, u32>::try_new(capacity) else {
        return;
    };

    for (step, pair) in ops.chunks_exact(2).enumerate() {
        let op = pair[0] % 9;
        let key = pair[1] % 32;
        let value = step as u32;

        match op {
            0 | 1 => {
                // put
                let was_present = cache.contains(&key);
                let old_len = cache.len();
                let previous = cache.put(key, value);

                assert_eq!(previous.is_some(), was_present);
                assert_eq!(cache.peek_mru(), Some((&key, &value)));
                if was_present || old_len < capacity {
                    assert_eq!(cache.len(), old_len + usize::from(!was_present));
                } else {
                    assert_eq!(cache.len(), capacity);
                }
            }
            2 => {
                // get promotes on hit
                if cache.get(&key).is_some() {
                    assert_eq!(cache.peek_mru().map(|(k, _)| *k), Some(key));
                }
            }
            3 => {
                // peek leaves order alone
                let before: Vec<u8> = cache.keys().copied().collect();
                let _ = cache.peek(&key);
                let after: Vec<u8> = cache.keys().copied().collect();
                assert_eq!(before, after);
            }
            4 => {
                // remove
                let was_present = cache.contains(&key);
                assert_eq!(cache.remove(&key), was_present);
                assert!(!cache.contains(&key));
            }
            5 => {
                // take
                let old_len = cache.len();
                if cache.take(&key).is_some() {
                    assert_eq!(cache.len(), old_len - 1);
                }
            }
            6 => {
                // touch
                if cache.touch(&key) {
                    assert_eq!(cache.recency_rank(&key), Some(0));
                }
            }
            7 => {
                // pop_lru
                let expected = cache.peek_lru().map(|(k, v)| (*k, *v));
                assert_eq!(cache.pop_lru(), expected);
            }
            8 => {
                // clear (rarely)
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
    }

    assert!(cache.check_invariants().is_ok());
});
