//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. Command-line flags in the server binary override these.

use std::env;
use std::time::Duration;

use crate::cache::EvictionPolicy;
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to bind
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Which entry to drop when full
    pub eviction_policy: EvictionPolicy,
    /// Expiry sweeper interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset or unparsable variables fall back to the default.
    ///
    /// # Environment Variables
    /// - `CACHE_HOST` - Bind address (default: 127.0.0.1)
    /// - `CACHE_PORT` - TCP port (default: 6379)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_EVICTION` - `lru`, `lfu` or `ttl` (default: lru)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("CACHE_HOST").unwrap_or(defaults.host),
            port: env_parse("CACHE_PORT").unwrap_or(defaults.port),
            max_size: env_parse("CACHE_MAX_SIZE").unwrap_or(defaults.max_size),
            eviction_policy: env_parse("CACHE_EVICTION").unwrap_or(defaults.eviction_policy),
            sweep_interval: env_parse("CACHE_SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
        }
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be a positive integer".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            max_size: 1000,
            eviction_policy: EvictionPolicy::Lru,
            sweep_interval: 60,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
