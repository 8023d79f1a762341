#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru::LruCache;

// Fuzz LruCache against a VecDeque model
//
// Properties:
// - Recency order matches the model after every operation
// - The evicted entry is always the model's least recently used
// - Structural invariants hold at the end of every run
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = usize::from(data[0] % 8) + 1;
    let Ok(mut cache) = LruCache::<u8, u8>::try_new(capacity) else {
        return;
    };
    // front = most recent
    let mut model: VecDeque<(u8, u8)> = VecDeque::new();

    for pair in data[1..].chunks_exact(2) {
        let key = pair[1] % 16;
        match pair[0] % 3 {
            0 => {
                let expected_evicted = match model.iter().position(|(k, _)| *k == key) {
                    Some(idx) => {
                        model.remove(idx);
                        None
                    }
                    None if model.len() == capacity => model.pop_back(),
                    None => None,
                };
                model.push_front((key, pair[0]));
                assert_eq!(cache.put_evicting(key, pair[0]), expected_evicted);
            }
            1 => {
                let expected = model.iter().position(|(k, _)| *k == key).and_then(|idx| {
                    let entry = model.remove(idx)?;
                    model.push_front(entry);
                    Some(entry.1)
                });
                assert_eq!(cache.get(&key).copied(), expected);
            }
            _ => {
                let expected = model
                    .iter()
                    .position(|(k, _)| *k == key)
                    .and_then(|idx| model.remove(idx));
                assert_eq!(cache.remove(&key), expected.is_some());
            }
        }

        let order: Vec<u8> = cache.keys().copied().collect();
        let expected: Vec<u8> = model.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, expected);
    }

    assert!(cache.check_invariants().is_ok());
});
