//! Eviction Policy Module
//!
//! Chooses which entry to drop when the store is at capacity.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::CacheEntry;
use crate::error::CacheError;

// == Eviction Policy ==
/// Eviction policy, fixed for the lifetime of a store.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least Recently Used - evict the entry with the oldest `accessed_at`
    #[default]
    Lru,
    /// Least Frequently Used - evict the entry with the lowest `access_count`
    Lfu,
    /// Oldest first - evict the entry with the oldest `created_at`.
    /// Does not look at whether anything has actually expired.
    Ttl,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Ttl => "ttl",
        }
    }

    // == Select Victim ==
    /// Picks the key to evict from `entries`.
    ///
    /// Ties on the policy's primary field are broken by key so the choice is
    /// deterministic regardless of map iteration order. Returns `None` only
    /// when `entries` is empty.
    pub fn select_victim<'a, V: 'a>(
        &self,
        entries: impl IntoIterator<Item = (&'a String, &'a CacheEntry<V>)>,
    ) -> Option<String> {
        entries
            .into_iter()
            .min_by(|(ka, ea), (kb, eb)| self.compare(ea, eb).then_with(|| ka.cmp(kb)))
            .map(|(key, _)| key.clone())
    }

    /// Orders two entries by eviction priority, lowest first.
    fn compare<V>(&self, a: &CacheEntry<V>, b: &CacheEntry<V>) -> Ordering {
        match self {
            EvictionPolicy::Lru => a.accessed_at.cmp(&b.accessed_at),
            EvictionPolicy::Lfu => a
                .access_count
                .cmp(&b.access_count)
                .then(a.accessed_at.cmp(&b.accessed_at)),
            EvictionPolicy::Ttl => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            "ttl" => Ok(EvictionPolicy::Ttl),
            _ => Err(CacheError::InvalidConfig(format!(
                "unknown eviction policy '{}', expected one of lru, lfu, ttl",
                s
            ))),
        }
    }
}
