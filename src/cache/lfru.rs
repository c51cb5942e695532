use super::{Cache, CachePolicy, CacheStats};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::num::NonZeroUsize;

struct Slot<V> {
    value: V,
    uses: u64,
    tick: u64,
}

/// Least frequently used, ties broken by least recently promoted.
///
/// Entries start with one use. Every hit (and every overwrite) moves the key
/// one bucket up; `tick` records when it entered its current bucket, so the
/// first key of the lowest bucket is the eviction victim.
pub struct LfruCache<K, V> {
    entries: HashMap<K, Slot<V>>,
    buckets: BTreeMap<u64, BTreeMap<u64, K>>,
    next_tick: u64,
    capacity: NonZeroUsize,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LfruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.get()),
            buckets: BTreeMap::new(),
            next_tick: 0,
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, super::CacheError> {
        super::non_zero(capacity).map(Self::new)
    }

    /// Use count of a resident key, without counting as a use.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.entries.get(key).map(|slot| slot.uses)
    }

    fn tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn detach(&mut self, uses: u64, tick: u64) {
        if let Some(bucket) = self.buckets.get_mut(&uses) {
            bucket.remove(&tick);
            if bucket.is_empty() {
                self.buckets.remove(&uses);
            }
        }
    }

    fn promote(&mut self, key: &K) {
        let tick = self.tick();
        let Some(slot) = self.entries.get_mut(key) else {
            return;
        };
        let (old_uses, old_tick) = (slot.uses, slot.tick);
        slot.uses += 1;
        slot.tick = tick;
        let new_uses = slot.uses;

        self.detach(old_uses, old_tick);
        self.buckets
            .entry(new_uses)
            .or_default()
            .insert(tick, key.clone());
    }

    fn evict(&mut self) {
        let Some(mut lowest) = self.buckets.first_entry() else {
            return;
        };
        let victim = lowest.get_mut().pop_first().map(|(_, key)| key);
        if lowest.get().is_empty() {
            lowest.remove();
        }
        if let Some(victim) = victim {
            self.entries.remove(&victim);
            self.stats.record_eviction();
        }
    }
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> for LfruCache<K, V> {
    fn cache(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            slot.value = value;
            self.promote(&key);
            return;
        }

        if self.entries.len() >= self.capacity.get() {
            self.evict();
        }

        let tick = self.tick();
        self.buckets.entry(1).or_default().insert(tick, key.clone());
        self.entries.insert(
            key,
            Slot {
                value,
                uses: 1,
                tick,
            },
        );
    }

    fn load(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }
        self.promote(key);
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
        CachePolicy::Lfru
    }
}
