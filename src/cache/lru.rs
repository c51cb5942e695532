use super::{Cache, CachePolicy, CacheStats};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::num::NonZeroUsize;

struct Slot<V> {
    value: V,
    tick: u64,
}

/// Least recently used. Writes and hitting reads both refresh recency.
///
/// Recency is a monotonically increasing tick; `order` maps tick -> key so the
/// stalest entry is always the first key of the tree.
pub struct LruCache<K, V> {
    entries: HashMap<K, Slot<V>>,
    order: BTreeMap<u64, K>,
    next_tick: u64,
    capacity: NonZeroUsize,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.get()),
            order: BTreeMap::new(),
            next_tick: 0,
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, super::CacheError> {
        super::non_zero(capacity).map(Self::new)
    }

    fn tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn touch(&mut self, key: &K) {
        let tick = self.tick();
        if let Some(slot) = self.entries.get_mut(key) {
            self.order.remove(&slot.tick);
            slot.tick = tick;
            self.order.insert(tick, key.clone());
        }
    }
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> for LruCache<K, V> {
    fn cache(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.touch(&key);
            if let Some(slot) = self.entries.get_mut(&key) {
                slot.value = value;
            }
            return;
        }

        if self.entries.len() >= self.capacity.get() {
            if let Some((_, stale)) = self.order.pop_first() {
                self.entries.remove(&stale);
                self.stats.record_eviction();
            }
        }

        let tick = self.tick();
        self.order.insert(tick, key.clone());
        self.entries.insert(key, Slot { value, tick });
    }

    fn load(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }
        self.touch(key);
        self.entries.get(key).map(|slot| &slot.value)
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
        CachePolicy::Lru
    }
}
