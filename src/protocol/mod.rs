//! Line Protocol Module
//!
//! Text protocol spoken over TCP, one command per line:
//!
//! - `GET <key>` - `OK <json-value>` or `NULL`
//! - `SET <key> <value...> [ttl]` - `OK` or `ERROR <message>`
//! - `DEL <key>` - `OK` or `NOT FOUND`
//! - `STATS` - `OK <json-object>`
//! - `KEYS` - `OK <json-array>`
//!
//! Anything malformed yields `ERROR <message>`; nothing here fails.

mod command;
mod response;

pub use command::Command;
pub use response::Response;

use tracing::debug;

use crate::cache::CacheEngine;

/// Runs a parsed command against the engine.
pub fn execute(engine: &CacheEngine<String>, command: Command) -> Response {
    match command {
        Command::Get { key } => match engine.get(&key) {
            Some(value) => Response::json(&value),
            None => Response::Null,
        },
        Command::Set { key, value, ttl } => match engine.set(key, value, ttl) {
            Ok(()) => Response::Ok,
            Err(e) => Response::Error(e.to_string()),
        },
        Command::Del { key } => {
            if engine.delete(&key) {
                Response::Ok
            } else {
                Response::NotFound
            }
        }
        Command::Stats => Response::json(&engine.stats()),
        Command::Keys => Response::json(&engine.keys()),
    }
}

/// Parses and executes one raw line.
pub fn handle_line(engine: &CacheEngine<String>, line: &str) -> Response {
    match Command::parse(line) {
        Ok(command) => execute(engine, command),
        Err(e) => {
            debug!("Rejected command {:?}: {}", line, e);
            Response::Error(e.to_string())
        }
    }
}
