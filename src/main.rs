//! tinycache - A lightweight in-memory cache server
//!
//! Serves the line protocol over TCP with TTL expiry and configurable
//! eviction.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinycache::{server, CacheEngine, Config, EvictionPolicy};

/// In-memory key-value cache server
///
/// Flags override the CACHE_* environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Maximum number of cached entries
    #[arg(long)]
    max_size: Option<usize>,

    /// Eviction policy: lru, lfu or ttl
    #[arg(long)]
    eviction: Option<EvictionPolicy>,

    /// Seconds between expiry sweeps
    #[arg(long)]
    sweep_interval: Option<u64>,
}

impl Args {
    fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(max_size) = self.max_size {
            config.max_size = max_size;
        }
        if let Some(policy) = self.eviction {
            config.eviction_policy = policy;
        }
        if let Some(interval) = self.sweep_interval {
            config.sweep_interval = interval;
        }
        config
    }
}

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Parse flags and merge them over the environment configuration
/// 2. Initialize tracing subscriber for logging
/// 3. Create the cache engine and start the expiry sweeper
/// 4. Serve TCP clients until SIGINT/SIGTERM
/// 5. Stop the sweeper
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinycache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tinycache v{}", env!("CARGO_PKG_VERSION"));

    let config = args.apply(Config::from_env());
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: max_size={}, eviction_policy={}, sweep_interval={}s",
        config.max_size, config.eviction_policy, config.sweep_interval
    );

    let engine: CacheEngine<String> = CacheEngine::new(config.max_size, config.eviction_policy);
    let sweeper = engine.spawn_sweeper(config.sweep_interval());

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    server::serve(listener, engine, shutdown_signal()).await;

    sweeper.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "tinycache",
            "--port",
            "7000",
            "--max-size",
            "5",
            "--eviction",
            "ttl",
        ]);
        let config = args.apply(Config::default());

        assert_eq!(config.port, 7000);
        assert_eq!(config.max_size, 5);
        assert_eq!(config.eviction_policy, EvictionPolicy::Ttl);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.sweep_interval, 60);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Args::try_parse_from(["tinycache", "--eviction", "random"]).is_err());
    }
}
