//! cache-client - command-line client for the tinycache server
//!
//! `cache-client` starts an interactive prompt; `cache-client demo` runs a
//! scripted walk through the protocol, including TTL expiry.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinycache::CacheClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Read commands from stdin
    Interactive,
    /// Run the scripted demonstration
    Demo,
}

/// Client for the tinycache line protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 6379)]
    port: u16,

    /// What to do once connected
    #[arg(value_enum, default_value_t = Mode::Interactive)]
    mode: Mode,
}

/// Demo script: (command, description)
const DEMO_COMMANDS: &[(&str, &str)] = &[
    ("SET user:1 john", "Setting user:1 to john"),
    ("SET user:2 jane", "Setting user:2 to jane"),
    ("GET user:1", "Getting user:1"),
    ("GET user:2", "Getting user:2"),
    ("SET temp_key expires in 5 seconds 5", "Setting key with 5 second TTL"),
    ("KEYS", "Listing all keys"),
    ("STATS", "Getting cache statistics"),
    ("DEL user:1", "Deleting user:1"),
    ("GET user:1", "Trying to get deleted key"),
    ("KEYS", "Listing keys after deletion"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let addr = format!("{}:{}", args.host, args.port);
    let client = CacheClient::connect(&addr)
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;
    println!("Connected to {}", addr);

    match args.mode {
        Mode::Interactive => interactive(client).await,
        Mode::Demo => demo(client).await,
    }
}

async fn interactive(mut client: CacheClient) -> Result<()> {
    println!("Type commands or 'quit' to exit");
    println!("Examples: SET key value, GET key, DEL key, STATS, KEYS");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if matches!(command.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        match client.send_command(command).await {
            Ok(response) => println!("{}", response),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                println!("Server closed the connection");
                return Ok(());
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    client.close().await?;
    println!("Connection closed");
    Ok(())
}

async fn demo(mut client: CacheClient) -> Result<()> {
    println!("Running cache demonstration...\n");

    for (command, description) in DEMO_COMMANDS {
        println!("{}", description);
        println!("Command: {}", command);
        let response = client.send_command(command).await?;
        println!("Response: {}", response);
        println!("{}", "-".repeat(50));
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    println!("Waiting 6 seconds to test TTL expiration...");
    tokio::time::sleep(Duration::from_secs(6)).await;

    let response = client.send_command("GET temp_key").await?;
    println!("GET temp_key after TTL: {}", response);

    let response = client.send_command("KEYS").await?;
    println!("Keys after TTL expiration: {}", response);

    client.close().await?;
    Ok(())
}
