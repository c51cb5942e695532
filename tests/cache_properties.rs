use cachebench::{build_cache, CachePolicy};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Cache(u8, u32),
    Load(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..32, any::<u32>()).prop_map(|(k, v)| Op::Cache(k, v)),
        (0u8..32).prop_map(Op::Load),
    ]
}

fn policy() -> impl Strategy<Value = CachePolicy> {
    prop::sample::select(CachePolicy::ALL.to_vec())
}

proptest! {
    #[test]
    fn counters_and_bounds_hold(policy in policy(), capacity in 1usize..12, ops in prop::collection::vec(op(), 0..300)) {
        let mut cache = build_cache::<u8, u32>(policy, capacity, 3).unwrap();
        let mut latest: HashMap<u8, u32> = HashMap::new();
        let mut new_inserts = 0usize;
        let mut misses = 0usize;

        for op in ops {
            match op {
                Op::Cache(key, value) => {
                    if !cache.contains(&key) {
                        new_inserts += 1;
                    }
                    cache.cache(key, value);
                    latest.insert(key, value);
                }
                Op::Load(key) => {
                    let present = cache.contains(&key);
                    match cache.load(&key) {
                        Some(value) => {
                            prop_assert!(present);
                            prop_assert_eq!(Some(value), latest.get(&key));
                        }
                        None => {
                            prop_assert!(!present);
                            misses += 1;
                        }
                    }
                }
            }

            prop_assert!(cache.len() <= capacity);
        }

        prop_assert_eq!(cache.miss_count(), misses);
        prop_assert_eq!(cache.evicted_count(), new_inserts - cache.len());
        prop_assert_eq!(cache.policy(), policy);
        prop_assert_eq!(cache.capacity(), capacity);
    }

    #[test]
    fn filling_to_capacity_never_evicts(policy in policy(), capacity in 1usize..64) {
        let mut cache = build_cache::<usize, usize>(policy, capacity, 11).unwrap();
        for key in 0..capacity {
            cache.cache(key, key);
        }
        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(cache.evicted_count(), 0);

        cache.cache(capacity, capacity);
        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(cache.evicted_count(), 1);
    }

    #[test]
    fn clear_stats_keeps_entries(policy in policy(), keys in prop::collection::vec(0u16..100, 1..50)) {
        let mut cache = build_cache::<u16, u16>(policy, 8, 5).unwrap();
        for &key in &keys {
            if cache.load(&key).is_none() {
                cache.cache(key, key);
            }
        }
        let len = cache.len();

        cache.clear_stats();

        prop_assert_eq!(cache.miss_count(), 0);
        prop_assert_eq!(cache.evicted_count(), 0);
        prop_assert_eq!(cache.len(), len);
    }
}

#[test]
fn lru_keeps_recently_read_key() {
    let mut cache = build_cache::<u32, &str>(CachePolicy::Lru, 2, 0).unwrap();
    cache.cache(1, "one");
    cache.cache(2, "two");
    assert_eq!(cache.load(&1), Some(&"one"));

    cache.cache(3, "three");

    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
}

#[test]
fn fifo_ignores_reads() {
    let mut cache = build_cache::<u32, &str>(CachePolicy::Fifo, 2, 0).unwrap();
    cache.cache(1, "one");
    cache.cache(2, "two");
    assert_eq!(cache.load(&1), Some(&"one"));

    cache.cache(3, "three");

    assert!(!cache.contains(&1));
    assert!(cache.contains(&2));
}

#[test]
fn zero_capacity_is_rejected() {
    for policy in CachePolicy::ALL {
        assert!(build_cache::<u32, u32>(policy, 0, 0).is_err());
    }
}
