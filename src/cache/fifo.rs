use super::{Cache, CachePolicy, CacheStats};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Evicts in insertion order. Replacing a value keeps the key's original slot.
pub struct FifoCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: NonZeroUsize,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> FifoCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.get()),
            order: VecDeque::with_capacity(capacity.get()),
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, super::CacheError> {
        super::non_zero(capacity).map(Self::new)
    }
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> for FifoCache<K, V> {
    fn cache(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        if self.entries.len() >= self.capacity.get() {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn load(&mut self, key: &K) -> Option<&V> {
        let value = self.entries.get(key);
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
        CachePolicy::Fifo
    }
}
