//! Bounded key/value caches with pluggable eviction policies.
//!
//! Every implementation counts misses and evictions so benchmark scenarios can
//! report hit ratios next to timings. Counters are reset with
//! [`Cache::clear_stats`] without touching the cached entries.

pub mod fifo;
pub mod lfru;
pub mod lru;
pub mod random;

pub use fifo::FifoCache;
pub use lfru::LfruCache;
pub use lru::LruCache;
pub use random::RandomCache;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    #[error("unknown cache policy '{0}' (expected one of: fifo, lru, lfru, rr)")]
    UnknownPolicy(String),
}

pub trait Cache<K, V> {
    /// Inserts or replaces `key`, evicting according to the policy when full.
    fn cache(&mut self, key: K, value: V);

    /// Looks up `key`. Counts a miss when absent; a hit may update policy state.
    fn load(&mut self, key: &K) -> Option<&V>;

    /// Membership test that leaves statistics and policy state untouched.
    fn contains(&self, key: &K) -> bool;

    fn evicted_count(&self) -> usize;

    fn miss_count(&self) -> usize;

    fn clear_stats(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn policy(&self) -> CachePolicy;

    fn stats(&self) -> CacheStats {
        CacheStats {
            missed: self.miss_count(),
            evicted: self.evicted_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub missed: usize,
    pub evicted: usize,
}

impl CacheStats {
    pub(crate) fn record_miss(&mut self) {
        self.missed += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evicted += 1;
    }

    pub(crate) fn clear(&mut self) {
        *self = CacheStats::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    Fifo,
    Lru,
    Lfru,
    #[serde(alias = "rr")]
    Random,
}

impl CachePolicy {
    pub const ALL: [CachePolicy; 4] = [
        CachePolicy::Fifo,
        CachePolicy::Lfru,
        CachePolicy::Lru,
        CachePolicy::Random,
    ];

    /// Name used in report file names, e.g. `cacheLRUCache<timestamp>.txt`.
    pub fn type_name(&self) -> &'static str {
        match self {
            CachePolicy::Fifo => "FIFOCache",
            CachePolicy::Lru => "LRUCache",
            CachePolicy::Lfru => "LFRUCache",
            CachePolicy::Random => "RRCache",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CachePolicy::Fifo => "fifo",
            CachePolicy::Lru => "lru",
            CachePolicy::Lfru => "lfru",
            CachePolicy::Random => "rr",
        };
        f.write_str(name)
    }
}

impl FromStr for CachePolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(CachePolicy::Fifo),
            "lru" => Ok(CachePolicy::Lru),
            "lfru" | "lfu" => Ok(CachePolicy::Lfru),
            "rr" | "random" => Ok(CachePolicy::Random),
            other => Err(CacheError::UnknownPolicy(other.to_string())),
        }
    }
}

pub(crate) fn non_zero(capacity: usize) -> std::result::Result<NonZeroUsize, CacheError> {
    NonZeroUsize::new(capacity).ok_or(CacheError::ZeroCapacity)
}

/// Builds a boxed cache for `policy`. `seed` only affects random replacement.
pub fn build_cache<K, V>(
    policy: CachePolicy,
    capacity: usize,
    seed: u64,
) -> std::result::Result<Box<dyn Cache<K, V> + Send>, CacheError>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    let capacity = non_zero(capacity)?;
    let cache: Box<dyn Cache<K, V> + Send> = match policy {
        CachePolicy::Fifo => Box::new(FifoCache::new(capacity)),
        CachePolicy::Lru => Box::new(LruCache::new(capacity)),
        CachePolicy::Lfru => Box::new(LfruCache::new(capacity)),
        CachePolicy::Random => Box::new(RandomCache::with_seed(capacity, seed)),
    };
    Ok(cache)
}
