//! Command parsing
//!
//! Turns one protocol line into a typed [`Command`].

use std::time::Duration;

use crate::error::{CacheError, Result};

/// A parsed client command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `GET <key>`
    Get { key: String },
    /// `SET <key> <value-tokens...> [<ttl-seconds>]`
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    /// `DEL <key>`
    Del { key: String },
    /// `STATS`
    Stats,
    /// `KEYS`
    Keys,
}

impl Command {
    /// Parses a single line. The command word is case-insensitive.
    ///
    /// For `SET`, a trailing token that parses as a float is taken as the
    /// TTL in seconds and the value is the remaining tokens joined by single
    /// spaces. This holds even when it leaves the value empty, so
    /// `SET k 5` stores `""` for five seconds. Every float is accepted: see
    /// [`ttl_from_secs`] for how out-of-range values map to a TTL.
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        let Some(word) = parts.first() else {
            return Err(CacheError::InvalidCommand("empty command".to_string()));
        };

        match word.to_uppercase().as_str() {
            "GET" => {
                let key = single_key(&parts, "GET")?;
                Ok(Command::Get { key })
            }
            "SET" => {
                if parts.len() < 3 {
                    return Err(CacheError::InvalidCommand(
                        "SET requires a key and a value".to_string(),
                    ));
                }
                let key = parts[1].to_string();
                let mut tokens = &parts[2..];
                let mut ttl = None;

                if let Some((last, rest)) = tokens.split_last() {
                    if let Ok(secs) = last.parse::<f64>() {
                        ttl = Some(ttl_from_secs(secs));
                        tokens = rest;
                    }
                }

                Ok(Command::Set {
                    key,
                    value: tokens.join(" "),
                    ttl,
                })
            }
            "DEL" => {
                let key = single_key(&parts, "DEL")?;
                Ok(Command::Del { key })
            }
            "STATS" => Ok(Command::Stats),
            "KEYS" => Ok(Command::Keys),
            other => Err(CacheError::UnknownCommand(other.to_string())),
        }
    }
}

/// Converts a TTL in seconds to a `Duration`.
///
/// Zero or negative values give `Duration::ZERO`, which is expired as soon as
/// the store clock moves past the insert. NaN, infinity and anything too large
/// for a `Duration` give `Duration::MAX`, a deadline that never arrives.
fn ttl_from_secs(secs: f64) -> Duration {
    if secs.is_nan() {
        return Duration::MAX;
    }
    if secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Extracts the only argument of a one-key command.
fn single_key(parts: &[&str], name: &str) -> Result<String> {
    match parts {
        [_, key] => Ok(key.to_string()),
        _ => Err(CacheError::InvalidCommand(format!(
            "{} requires exactly one key",
            name
        ))),
    }
}
