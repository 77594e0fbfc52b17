//! Connection handling for the editor's IPC server
//!
//! Establishes the TCP connection, sends the registration event, and wraps
//! the stream halves in a line-oriented message transport. The halves stay
//! split so the relay loop can read and write independently.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use pb_core::config::BridgeConfig;
use pb_core::ipc::{ClientMessage, ServerMessage};
use pb_core::time::{current_time_millis, elapsed_millis};
use pb_core::IpcError;

use crate::reconnect::ExponentialBackoff;

/// Establishes registered connections to the IPC server
pub struct BridgeConnector {
    config: BridgeConfig,
}

impl BridgeConnector {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Connect with automatic retry
    ///
    /// Retries forever with backoff; returns `None` only when cancelled.
    pub async fn connect_with_retry(
        &self,
        backoff: &mut ExponentialBackoff,
        cancel: &CancellationToken,
    ) -> Option<(MessageReader, MessageWriter)> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            match self.try_connect().await {
                Ok(connection) => {
                    tracing::info!("Connected to ipc server at {}", self.config.ipc_address());
                    return Some(connection);
                }
                Err(e) => {
                    let delay = backoff.next_delay();
                    tracing::warn!(
                        "Connection to ipc server failed: {}. Retrying in {:?}",
                        e,
                        delay
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => return None,
                    }
                }
            }
        }
    }

    /// Attempt a single connection and send the registration event
    ///
    /// The server answers with a `registered` message on the same stream;
    /// the relay loop picks it up as a regular event.
    pub async fn try_connect(&self) -> Result<(MessageReader, MessageWriter), IpcError> {
        let address = self.config.ipc_address();
        tracing::debug!("Connecting to {}", address);

        let stream =
            tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(&address))
                .await
                .map_err(|_| IpcError::Timeout(self.config.connect_timeout))?
                .map_err(|e| IpcError::ConnectionFailed(format!("{}: {}", address, e)))?;

        let (reader, mut writer) = split_stream(stream);

        writer
            .send(&ClientMessage::RegisterAs {
                name: self.config.client_name.clone(),
            })
            .await?;

        Ok((reader, writer))
    }
}

fn split_stream(stream: TcpStream) -> (MessageReader, MessageWriter) {
    let (read_half, write_half) = stream.into_split();
    (
        MessageReader {
            lines: BufReader::new(read_half).lines(),
        },
        MessageWriter { writer: write_half },
    )
}

/// Read half of an established connection
pub struct MessageReader {
    lines: Lines<BufReader<OwnedReadHalf>>,
}

impl MessageReader {
    /// Receive the next message; `None` on clean EOF
    ///
    /// Cancellation safe: `Lines` accumulates partially received bytes in
    /// its own state rather than in the pending future, so a read cancelled
    /// mid-line by `select!` resumes the same line on the next call.
    pub async fn recv(&mut self) -> Result<Option<ServerMessage>, IpcError> {
        loop {
            let line = match self.lines.next_line().await? {
                Some(line) => line,
                None => return Ok(None),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(ServerMessage::from_json_line(trimmed)?));
        }
    }
}

/// Write half of an established connection
pub struct MessageWriter {
    writer: OwnedWriteHalf,
}

impl MessageWriter {
    /// Send one message as a JSON line
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), IpcError> {
        let line = message.to_json_line()?;
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

/// Measure the round-trip time to an IPC server
///
/// Connects fresh, sends a `ping`, and waits for the matching `pong`.
/// Events arriving in between are skipped.
pub async fn ping(address: &str, timeout: Duration) -> Result<Duration, IpcError> {
    tokio::time::timeout(timeout, async {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| IpcError::ConnectionFailed(format!("{}: {}", address, e)))?;
        let (mut reader, mut writer) = split_stream(stream);

        let sent = current_time_millis();
        writer.send(&ClientMessage::Ping { timestamp: sent }).await?;

        loop {
            match reader.recv().await? {
                Some(ServerMessage::Pong { timestamp }) => {
                    return Ok(Duration::from_millis(elapsed_millis(timestamp)));
                }
                Some(_) => continue,
                None => {
                    return Err(IpcError::ConnectionLost(
                        "server closed the connection during ping".to_string(),
                    ));
                }
            }
        }
    })
    .await
    .map_err(|_| IpcError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;

    async fn connected_pair() -> (MessageReader, MessageWriter, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let client = TcpStream::connect(address).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        let (reader, writer) = split_stream(client);
        (reader, writer, server)
    }

    #[tokio::test]
    async fn test_recv_resumes_a_line_interrupted_mid_read() {
        let (mut reader, _writer, mut server) = connected_pair().await;

        // First half of a message, no newline yet
        server.write_all(b"{\"type\":\"ping\",\"time").await.unwrap();

        // A competing branch wins the race while the line is incomplete
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            message = reader.recv() => panic!("incomplete line produced {:?}", message),
        }

        server.write_all(b"stamp\":7}\n").await.unwrap();

        match reader.recv().await.unwrap() {
            Some(ServerMessage::Ping { timestamp }) => assert_eq!(timestamp, 7),
            other => panic!("expected the reassembled ping, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_peer_closes() {
        let (mut reader, _writer, server) = connected_pair().await;
        drop(server);

        assert!(reader.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recv_skips_blank_lines_between_messages() {
        let (mut reader, _writer, mut server) = connected_pair().await;
        server
            .write_all(b"\n{\"type\":\"pong\",\"timestamp\":3}\n")
            .await
            .unwrap();

        match reader.recv().await.unwrap() {
            Some(ServerMessage::Pong { timestamp }) => assert_eq!(timestamp, 3),
            other => panic!("expected pong, got {:?}", other),
        }
    }
}
