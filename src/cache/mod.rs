//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and policy-driven eviction.

mod engine;
mod entry;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::CacheEntry;
pub use policy::EvictionPolicy;
pub use stats::CacheStats;
pub use store::CacheStore;
