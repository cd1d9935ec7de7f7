//! TTL Expiry Sweeper
//!
//! Background task that periodically removes expired cache entries so that
//! keys which are never read again do not hold memory forever. Reads already
//! skip expired entries, so the sweeper only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::CacheEngine;

// == Expiry Sweeper ==
/// Handle to a running sweeper task.
///
/// Dropping the handle signals the task to stop at its next wake-up; use
/// [`ExpirySweeper::shutdown`] to stop it and wait for it to finish.
#[derive(Debug)]
pub struct ExpirySweeper {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Spawns a sweeper that purges `engine` every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<V>(engine: CacheEngine<V>, interval: Duration) -> Self
    where
        V: Clone + Send + 'static,
    {
        Self::spawn_with(interval, move || engine.purge_expired())
    }

    /// Spawns the sweep loop around an arbitrary sweep body.
    ///
    /// Each sweep runs on the blocking pool; a panic inside one sweep is
    /// logged and the loop carries on with the next interval.
    fn spawn_with<F>(interval: Duration, sweep: F) -> Self
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let sweep = Arc::new(sweep);

        let handle = tokio::spawn(async move {
            info!(
                "Starting expiry sweeper with interval of {:?}",
                interval
            );

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    // Fires on an explicit shutdown and when the handle is dropped
                    _ = shutdown_rx.changed() => break,
                }

                let sweep = Arc::clone(&sweep);
                match tokio::task::spawn_blocking(move || sweep()).await {
                    Ok(removed) if removed > 0 => {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    }
                    Ok(_) => debug!("Expiry sweep: no expired entries found"),
                    Err(e) => error!("Error in expiry sweep: {}", e),
                }
            }

            info!("Expiry sweeper stopped");
        });

        Self {
            handle,
            shutdown_tx,
        }
    }

    /// Signals the sweeper to stop and waits for it to exit.
    ///
    /// A sweep already in progress is allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                error!("Expiry sweeper terminated abnormally: {}", e);
            }
        }
    }

    /// Stops the sweeper immediately without waiting.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
