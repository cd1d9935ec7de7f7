//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.
//!
//! Absence of a key is never an error: `get` yields `None` and `delete`
//! yields `false`. Everything here is either a capacity failure from the
//! store or a fault caught at the protocol/config boundary.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Store is at capacity and no entry could be evicted
    #[error("cache full: {0}")]
    CacheFull(String),

    /// Line could not be parsed into a command
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Command word is not recognised
    #[error("unknown command {0}")]
    UnknownCommand(String),

    /// Startup configuration rejected
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
