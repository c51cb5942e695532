use super::{Cache, CachePolicy, CacheStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Random replacement.
///
/// A new key is inserted first and a uniformly chosen resident is dropped when
/// the cache overflows, so the fresh key itself can be the victim. `keys` keeps
/// residents addressable by index for O(1) sampling.
pub struct RandomCache<K, V> {
    entries: HashMap<K, (V, usize)>,
    keys: Vec<K>,
    capacity: NonZeroUsize,
    rng: StdRng,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> RandomCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    pub fn with_seed(capacity: NonZeroUsize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    pub fn try_new(capacity: usize) -> Result<Self, super::CacheError> {
        super::non_zero(capacity).map(Self::new)
    }

    fn with_rng(capacity: NonZeroUsize, rng: StdRng) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.get() + 1),
            keys: Vec::with_capacity(capacity.get() + 1),
            capacity,
            rng,
            stats: CacheStats::default(),
        }
    }

    fn remove_random(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        let index = self.rng.gen_range(0..self.keys.len());
        let victim = self.keys.swap_remove(index);
        self.entries.remove(&victim);
        if let Some(moved) = self.keys.get(index) {
            if let Some(entry) = self.entries.get_mut(moved) {
                entry.1 = index;
            }
        }
        self.stats.record_eviction();
    }
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> for RandomCache<K, V> {
    fn cache(&mut self, key: K, value: V) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.0 = value;
            return;
        }

        self.keys.push(key.clone());
        self.entries.insert(key, (value, self.keys.len() - 1));

        if self.entries.len() > self.capacity.get() {
            self.remove_random();
        }
    }

    fn load(&mut self, key: &K) -> Option<&V> {
        let value = self.entries.get(key).map(|(value, _)| value);
        if value.is_none() {
            self.stats.record_miss();
        }
        value
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn evicted_count(&self) -> usize {
        self.stats.evicted
    }

    fn miss_count(&self) -> usize {
        self.stats.missed
    }

    fn clear_stats(&mut self) {
        self.stats.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn policy(&self) -> CachePolicy {
        CachePolicy::Random
    }
}
