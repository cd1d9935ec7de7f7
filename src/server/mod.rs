//! TCP Server Module
//!
//! Accepts client connections and runs one task per connection, each
//! sharing the same `CacheEngine`.

mod connection;

pub use connection::{handle_connection, MAX_LINE_LENGTH};

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::cache::CacheEngine;

/// Accepts connections on `listener` until `shutdown` resolves.
///
/// On shutdown the listener is closed and open connections are aborted.
pub async fn serve<F>(listener: TcpListener, engine: CacheEngine<String>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut connections = JoinSet::new();

    if let Ok(addr) = listener.local_addr() {
        info!("Cache server listening on {}", addr);
    }

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    connections.spawn(handle_connection(stream, addr, engine.clone()));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Back off so a persistent error such as fd exhaustion does not spin
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            },
            // Reap finished connection tasks
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown => {
                info!("Shutdown requested, closing {} open connections", connections.len());
                break;
            }
        }
    }

    connections.shutdown().await;
    info!("Cache server stopped");
}
