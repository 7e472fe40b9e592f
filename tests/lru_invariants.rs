// ==============================================
// LRU BEHAVIORAL TESTS (integration)
// ==============================================
//
// End-to-end checks through the public API only: capacity bounds, eviction
// order under realistic access traces, and structural invariants after long
// mixed workloads. Unit-level coverage lives next to the implementation.

use lrukit::prelude::*;

// ==============================================
// Capacity Bound
// ==============================================

mod capacity_bound {
    use super::*;

    #[test]
    fn len_never_exceeds_capacity() {
        for capacity in [0usize, 1, 2, 7, 64] {
            let mut cache = LruCache::new(capacity);
            for i in 0..200u32 {
                cache.insert(i, i);
                assert!(
                    cache.len() <= capacity,
                    "len {} exceeded capacity {}",
                    cache.len(),
                    capacity
                );
            }
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn capacity_zero_is_honored() {
        let mut cache = LruCache::new(0);
        assert_eq!(cache.capacity(), 0);
        cache.insert("key", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"key"), None);
        assert_eq!(cache.peek_lru(), None);
    }

    #[test]
    fn full_cache_evicts_exactly_one_per_new_key() {
        let mut cache = LruCache::new(3);
        for i in 0..3u32 {
            cache.insert(i, i);
        }
        for i in 3..10u32 {
            cache.insert(i, i);
            assert_eq!(cache.len(), 3);
            assert!(!cache.contains(&(i - 3)));
        }
    }
}

// ==============================================
// Access Traces
// ==============================================
//
// Fixed sequences with hand-computed expected outcomes, covering the
// interactions of get-promotion, overwrite-promotion, and eviction.

mod access_traces {
    use super::*;

    #[test]
    fn get_then_insert_evicts_the_unread_key() {
        let mut cache = LruCache::new(2);
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.get(&1), Some(&1));
        cache.insert(3, 3);
        assert_eq!(cache.get(&2), None);
        cache.insert(4, 4);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(&3));
        assert_eq!(cache.get(&4), Some(&4));
    }

    #[test]
    fn overwrite_counts_as_a_touch() {
        let mut cache = LruCache::new(4);
        for (k, v) in [(1, 10), (2, 20), (3, 30), (4, 40)] {
            cache.insert(k, v);
        }
        assert_eq!(cache.get(&1), Some(&10));
        cache.insert(5, 50);
        assert_eq!(cache.get(&2), None);
        cache.insert(3, 33);
        assert_eq!(cache.get(&3), Some(&33));
        cache.insert(6, 60);
        assert_eq!(cache.get(&4), None);
        assert_eq!(cache.get(&5), Some(&50));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn capacity_one_holds_only_the_latest_key() {
        let mut cache = LruCache::new(1);
        cache.insert(2, 1);
        assert_eq!(cache.get(&2), Some(&1));
        cache.insert(3, 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(&2));
    }

    #[test]
    fn capacity_one_overwrite_keeps_the_key() {
        let mut cache = LruCache::new(1);
        cache.insert(2, 1);
        cache.insert(2, 2);
        assert_eq!(cache.get(&2), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn touch_and_pop_agree_on_order() {
        let mut cache = LruCache::new(4);
        for i in 0..4u32 {
            cache.insert(i, i);
        }
        cache.touch(&0);
        cache.touch(&1);
        assert_eq!(cache.pop_lru(), Some((2, 2)));
        assert_eq!(cache.pop_lru(), Some((3, 3)));
        assert_eq!(cache.pop_lru(), Some((0, 0)));
        assert_eq!(cache.pop_lru(), Some((1, 1)));
        assert_eq!(cache.pop_lru(), None);
    }
}

// ==============================================
// Structural Invariants Under Churn
// ==============================================

mod churn {
    use super::*;

    #[test]
    fn invariants_survive_a_long_mixed_workload() {
        let mut cache = LruCache::new(32);
        for i in 0..10_000u64 {
            match i % 5 {
                0 | 1 => {
                    cache.insert(i % 101, i);
                },
                2 => {
                    cache.get(&(i % 101));
                },
                3 => {
                    cache.touch(&(i % 101));
                },
                _ => {
                    cache.remove(&(i % 101));
                },
            }
            if i % 500 == 0 {
                cache.check_invariants().unwrap();
            }
        }
        cache.check_invariants().unwrap();
    }

    #[test]
    fn drain_via_pop_lru_reaches_empty() {
        let mut cache = LruCache::new(64);
        for i in 0..64u32 {
            cache.insert(i, i);
        }
        let mut drained = 0;
        while cache.pop_lru().is_some() {
            drained += 1;
            cache.check_invariants().unwrap();
        }
        assert_eq!(drained, 64);
        assert!(cache.is_empty());
    }
}

// ==============================================
// Concurrent Wrapper
// ==============================================

#[cfg(feature = "concurrency")]
mod concurrent {
    use super::*;
    use std::thread;

    #[test]
    fn parallel_mixed_workload_preserves_invariants() {
        let cache = ConcurrentLruCache::new(64);
        let mut handles = Vec::new();
        for t in 0..8u64 {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for i in 0..500u64 {
                    let key = (t * 37 + i) % 200;
                    match i % 4 {
                        0 => {
                            cache.insert(key, i);
                        },
                        1 => {
                            cache.get(&key);
                        },
                        2 => {
                            cache.touch(&key);
                        },
                        _ => {
                            cache.remove(&key);
                        },
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 64);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn peek_does_not_promote_across_threads() {
        let cache = ConcurrentLruCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        let reader = cache.clone();
        thread::spawn(move || {
            assert!(reader.peek(&1).is_some());
        })
        .join()
        .unwrap();

        cache.insert(3, "c");
        assert!(!cache.contains(&1), "peek must not protect a key");
        assert!(cache.contains(&2));
    }
}
