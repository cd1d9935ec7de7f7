//! Per-client connection loop

use std::io;
use std::net::SocketAddr;

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use crate::cache::CacheEngine;
use crate::protocol;

/// Longest command line accepted, excluding the newline.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Serves one client until it disconnects or the stream fails.
pub async fn handle_connection(stream: TcpStream, addr: SocketAddr, engine: CacheEngine<String>) {
    info!("Client connected: {}", addr);

    let (reader, writer) = stream.into_split();
    if let Err(e) = serve_lines(reader, writer, addr, &engine).await {
        warn!("Error handling client {}: {}", addr, e);
    }

    info!("Closing connection to {}", addr);
}

/// Reads commands line by line and answers each with one response line.
///
/// Blank lines are ignored. Returns when the reader hits EOF. A line longer
/// than [`MAX_LINE_LENGTH`] ends the connection with an `InvalidData` error.
async fn serve_lines<R, W>(
    reader: R,
    mut writer: W,
    peer: SocketAddr,
    engine: &CacheEngine<String>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    while let Some(line) = lines.next().await {
        let line = line.map_err(|e| match e {
            LinesCodecError::MaxLineLengthExceeded => io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {} bytes", MAX_LINE_LENGTH),
            ),
            LinesCodecError::Io(e) => e,
        })?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        debug!("Command from {}: {}", peer, command);
        let response = protocol::handle_line(engine, command);

        writer.write_all(format!("{}\n", response).as_bytes()).await?;
        writer.flush().await?;
    }

    writer.shutdown().await
}
