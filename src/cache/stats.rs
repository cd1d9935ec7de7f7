//! Cache Statistics Module
//!
//! Point-in-time snapshot of store occupancy plus running access counters.

use serde::Serialize;

use crate::cache::EvictionPolicy;

// == Cache Stats ==
/// Snapshot returned by `stats()` and serialized for the STATS command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, expired-but-unswept ones included
    pub total_entries: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Entries that are expired but not yet removed
    pub expired_count: usize,
    /// Configured eviction policy
    pub eviction_policy: EvictionPolicy,
    /// total_entries / max_size * 100
    pub memory_usage_percentage: f64,
    /// Number of gets that returned a value
    pub hits: u64,
    /// Number of gets that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries dropped to make room
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot for a store of the given shape.
    pub fn new(max_size: usize, eviction_policy: EvictionPolicy) -> Self {
        Self {
            total_entries: 0,
            max_size,
            expired_count: 0,
            eviction_policy,
            memory_usage_percentage: 0.0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Occupancy ==
    /// Fills in the occupancy fields and derives the usage percentage.
    pub fn set_occupancy(&mut self, total_entries: usize, expired_count: usize) {
        self.total_entries = total_entries;
        self.expired_count = expired_count;
        self.memory_usage_percentage = if self.max_size == 0 {
            0.0
        } else {
            total_entries as f64 / self.max_size as f64 * 100.0
        };
    }
}
