//! Client Module
//!
//! Minimal async client for the line protocol, used by the `cache-client`
//! binary and the integration tests.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

/// A connection to a cache server.
pub struct CacheClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl CacheClient {
    /// Connects to the server at `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    /// Sends one command line and waits for its response line.
    ///
    /// The command must not contain a newline, and must not be blank since
    /// the server does not answer blank lines.
    pub async fn send_command(&mut self, command: &str) -> io::Result<String> {
        if command.contains(['\r', '\n']) || command.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "command must be a single non-blank line",
            ));
        }

        self.writer
            .write_all(format!("{}\n", command).as_bytes())
            .await?;
        self.writer.flush().await?;

        match self.lines.next_line().await? {
            Some(response) => Ok(response.trim_end().to_string()),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            )),
        }
    }

    /// Closes the write side of the connection.
    pub async fn close(mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}
