//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`] which handles WebSocket I/O for text frames.
//! This is a thin layer that just sends/receives frames - protocol logic
//! remains in the Sans-IO `App`.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Connection attempt took longer than the configured timeout.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// Connection is closed; nothing more can be sent.
    #[error("connection closed")]
    Closed,
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for the WebSocket handshake (TCP + TLS + upgrade).
    pub connect_timeout: Duration,
    /// Capacity of the inbound and outbound frame channels.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { connect_timeout: Duration::from_secs(10), channel_capacity: 32 }
    }
}

impl TransportConfig {
    /// Short timeouts for local development and tests.
    pub fn development() -> Self {
        Self { connect_timeout: Duration::from_secs(2), ..Self::default() }
    }
}

/// Handle to a connected client with WebSocket transport.
///
/// Provides channels for frame transport. Frames are sent/received via
/// the channels, and an internal task handles the WebSocket I/O. When the
/// socket closes, `from_server` yields `None`.
pub struct ConnectedClient {
    /// Send text frames to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive text frames from the server.
    pub from_server: mpsc::Receiver<String>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedClient {
    /// Queue a text frame for the server.
    pub async fn send(&self, text: String) -> Result<(), TransportError> {
        self.to_server.send(text).await.map_err(|_| TransportError::Closed)
    }

    /// Next text frame from the server. `None` once the connection is closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_server.recv().await
    }

    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to a Chatline server with the default configuration.
pub async fn connect(url: &str) -> Result<ConnectedClient, TransportError> {
    connect_with_config(url, TransportConfig::default()).await
}

/// Connect to a Chatline server.
///
/// Accepts `ws://` and `wss://` URLs. Returns a [`ConnectedClient`] with
/// channels for frame transport.
pub async fn connect_with_config(
    url: &str,
    config: TransportConfig,
) -> Result<ConnectedClient, TransportError> {
    // Another component may already have picked a provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let handshake = tokio_tungstenite::connect_async(url);
    let (ws, response) = tokio::time::timeout(config.connect_timeout, handshake)
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    tracing::debug!(%url, status = %response.status(), "websocket handshake complete");

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(config.channel_capacity);
    let (from_server_tx, from_server_rx) = mpsc::channel::<String>(config.channel_capacity);

    let handle = tokio::spawn(run_connection(ws, to_server_rx, from_server_tx));

    Ok(ConnectedClient {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
///
/// Returns when either side goes away. Dropping `from_server` on return is
/// what signals the close to the reader.
async fn run_connection(
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<String>,
) {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => {
                let Some(text) = outgoing else {
                    // Handle dropped: close politely.
                    let _ = sink.close().await;
                    break;
                };
                if let Err(e) = sink.send(Message::text(text)).await {
                    tracing::warn!(error = %e, "send failed");
                    break;
                }
            }

            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if from_server.send(text.to_string()).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Binary(bytes))) => {
                        tracing::debug!(len = bytes.len(), "ignoring binary frame");
                    },
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(?frame, "server closed connection");
                        break;
                    },
                    // Ping/pong is answered by tungstenite itself.
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {},
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "receive failed");
                        break;
                    },
                    None => break,
                }
            }
        }
    }
}
