//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and access bookkeeping.
///
/// The key is not stored here; it lives only as the key of the store's map.
///
/// Expiry is measured from `created_at`, so overwriting a value does not
/// extend its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Set once at insertion
    pub created_at: Instant,
    /// Refreshed on every successful read and on overwrite
    pub accessed_at: Instant,
    /// Number of successful reads since creation
    pub access_count: u64,
    /// Time to live, None = no expiration
    pub ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now`.
    pub fn new(value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            accessed_at: now,
            access_count: 0,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired only once `now` is strictly
    /// past `created_at + ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at() {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    /// Returns the instant after which the entry is expired.
    pub fn expires_at(&self) -> Option<Instant> {
        // An unrepresentable deadline is treated as never expiring.
        self.ttl.and_then(|ttl| self.created_at.checked_add(ttl))
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: Instant) {
        self.accessed_at = now;
        self.access_count += 1;
    }

    // == Overwrite ==
    /// Replaces value and ttl in place, keeping `created_at` and `access_count`.
    pub fn overwrite(&mut self, value: V, ttl: Option<Duration>, now: Instant) {
        self.value = value;
        self.ttl = ttl;
        self.accessed_at = now;
    }
}
