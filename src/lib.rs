//! tinycache - A lightweight in-memory cache server
//!
//! Key-value cache with TTL expiry and LRU/LFU/oldest-first eviction,
//! spoken to over a line-based TCP text protocol.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tasks;

pub use cache::{CacheEngine, CacheStats, EvictionPolicy};
pub use client::CacheClient;
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::ExpirySweeper;
