//! Cache Engine Module
//!
//! Thread-safe handle over a `CacheStore`, shared by every connection and
//! the background sweeper.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, EvictionPolicy};
use crate::error::Result;
use crate::tasks::ExpirySweeper;

// == Cache Engine ==
/// Cloneable handle to a store guarded by one mutex.
///
/// Every method takes the lock exactly once and runs to completion under it,
/// so operations are totally ordered. The lock never poisons; a panic inside
/// a critical section releases it on unwind.
pub struct CacheEngine<V> {
    store: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for CacheEngine<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> CacheEngine<V> {
    /// Creates an engine with fixed capacity and policy.
    pub fn new(max_size: usize, policy: EvictionPolicy) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_size, policy))),
        }
    }

    /// Returns the value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.lock().get(key)
    }

    /// Inserts or overwrites `key`. See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        self.store.lock().set(key.into(), value, ttl)
    }

    /// Removes `key`; `false` if it was not there.
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    /// Snapshot of live keys.
    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Runs one sweep and returns how many entries it removed.
    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.store.lock().max_size()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.store.lock().policy()
    }
}

impl<V: Clone + Send + 'static> CacheEngine<V> {
    /// Starts the background expiry sweeper for this engine.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self, interval: Duration) -> ExpirySweeper {
        ExpirySweeper::spawn(self.clone(), interval)
    }
}
