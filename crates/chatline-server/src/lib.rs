//! Chatline relay server.
//!
//! Production server using tokio-tungstenite for WebSocket transport and the
//! Tokio async runtime.
//!
//! # Architecture
//!
//! The [`Relay`] follows the Sans-IO pattern: it turns [`RelayEvent`]s into
//! [`RelayAction`]s without doing any I/O. [`Server`] owns the sockets,
//! feeds events in and executes the resulting actions.
//!
//! # Components
//!
//! - [`Relay`]: Action-based relay (pure logic, no I/O)
//! - [`SessionRegistry`]: Connected sessions and their names
//! - [`Server`]: Production runtime that executes Relay actions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod registry;
mod relay;

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

pub use error::ServerError;
use futures::{SinkExt, StreamExt, stream::SplitSink};
pub use registry::{SessionInfo, SessionRegistry};
pub use relay::{LogLevel, Relay, RelayAction, RelayEvent};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{
        Mutex, RwLock,
        mpsc::{self, error::TrySendError},
    },
    task::AbortHandle,
};
use tokio_tungstenite::{WebSocketStream, tungstenite::Message};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Outbound side of one session.
struct SessionOutbound {
    /// Frames waiting for the writer task, in relay order.
    frames: mpsc::Sender<Message>,
    /// Writer task. Aborting it disconnects the session.
    writer: AbortHandle,
}

/// Shared state for all connections.
struct SharedState {
    /// Map of session ID to its outbound queue.
    ///
    /// Each session has a single writer task draining its queue, ensuring
    /// ordering. Relay actions only enqueue, so no socket write happens while
    /// the relay lock is held.
    outbound: RwLock<HashMap<u64, SessionOutbound>>,
    /// Frames a session may have queued before it is disconnected.
    send_queue_capacity: usize,
}

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "0.0.0.0:8000")
    pub bind_address: String,
    /// Frames queued for a session that is not reading before it is
    /// disconnected.
    pub send_queue_capacity: usize,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8000".to_string(), send_queue_capacity: 256 }
    }
}

/// Production Chatline server.
///
/// Wraps [`Relay`] with a TCP listener and WebSocket upgrade. Any request
/// path is accepted; clients conventionally use `/ws`.
pub struct Server {
    relay: Relay,
    listener: TcpListener,
    send_queue_capacity: usize,
}

impl Server {
    /// Create and bind a new server.
    pub async fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        if config.send_queue_capacity == 0 {
            return Err(ServerError::Config("send queue capacity must be at least 1".to_string()));
        }

        let listener = TcpListener::bind(&config.bind_address)
            .await
            .map_err(|e| ServerError::Config(format!("cannot bind {}: {e}", config.bind_address)))?;

        Ok(Self {
            relay: Relay::new(),
            listener,
            send_queue_capacity: config.send_queue_capacity,
        })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server, accepting connections and relaying frames.
    ///
    /// This method runs until the task is cancelled.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(addr = %self.local_addr()?, "server starting");

        let relay = Arc::new(Mutex::new(self.relay));
        let shared = Arc::new(SharedState {
            outbound: RwLock::new(HashMap::new()),
            send_queue_capacity: self.send_queue_capacity,
        });

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let relay = Arc::clone(&relay);
                    let shared = Arc::clone(&shared);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, relay, shared).await {
                            tracing::warn!(%peer, error = %e, "connection error");
                        }
                    });
                },
                Err(e) => {
                    tracing::error!(error = %e, "accept error");
                },
            }
        }
    }
}

/// Handle a single WebSocket connection from upgrade to close.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    relay: Arc<Mutex<Relay>>,
    shared: Arc<SharedState>,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| ServerError::Handshake(e.to_string()))?;

    let session_id = random_session_id()?;
    tracing::debug!(session_id, %peer, "new connection");

    let (sink, mut source) = ws.split();
    let (frames, queue) = mpsc::channel(shared.send_queue_capacity);
    let mut writer = tokio::spawn(write_frames(session_id, sink, queue));
    {
        let mut outbound = shared.outbound.write().await;
        outbound.insert(session_id, SessionOutbound { frames, writer: writer.abort_handle() });
    }

    dispatch(&relay, &shared, RelayEvent::ConnectionAccepted { session_id, peer: Some(peer) })
        .await;

    let reason = loop {
        tokio::select! {
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let event = RelayEvent::FrameReceived { session_id, text: text.to_string() };
                    dispatch(&relay, &shared, event).await;
                },
                Some(Ok(Message::Close(_))) | None => break "closed by peer".to_string(),
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!(session_id, len = bytes.len(), "ignoring binary frame");
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => break e.to_string(),
            },

            // Writer gone: the socket failed or the session was evicted.
            stopped = &mut writer => break match stopped {
                Ok(reason) => reason,
                Err(_) => "not reading, send queue full".to_string(),
            },
        }
    };

    {
        let mut outbound = shared.outbound.write().await;
        outbound.remove(&session_id);
    }
    writer.abort();

    dispatch(&relay, &shared, RelayEvent::ConnectionClosed { session_id, reason }).await;

    Ok(())
}

/// Drain a session's queue into its socket. Returns why it stopped.
async fn write_frames(
    session_id: u64,
    mut sink: WsSink,
    mut queue: mpsc::Receiver<Message>,
) -> String {
    while let Some(message) = queue.recv().await {
        if let Err(e) = sink.send(message).await {
            tracing::debug!(session_id, error = %e, "send failed");
            return format!("send failed: {e}");
        }
    }
    "send queue closed".to_string()
}

/// Feed one event to the relay and execute its actions.
///
/// The relay lock is held while enqueueing so every session observes
/// broadcasts in the same order.
async fn dispatch(relay: &Mutex<Relay>, shared: &SharedState, event: RelayEvent) {
    let mut relay = relay.lock().await;
    let actions = relay.process_event(event);
    execute_actions(actions, shared).await;
}

/// Execute relay actions.
///
/// Never waits on a socket. A session whose queue is full is disconnected.
async fn execute_actions(actions: Vec<RelayAction>, shared: &SharedState) {
    let outbound = shared.outbound.read().await;

    for action in actions {
        match action {
            RelayAction::SendToSession { session_id, text } => {
                let Some(session) = outbound.get(&session_id) else {
                    tracing::debug!(session_id, "send skipped: session already gone");
                    continue;
                };
                match session.frames.try_send(Message::text(text)) {
                    Ok(()) => {},
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(session_id, "send queue full, disconnecting session");
                        session.writer.abort();
                    },
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!(session_id, "send skipped: writer stopped");
                    },
                }
            },

            RelayAction::Log { level, message } => match level {
                LogLevel::Debug => tracing::debug!("{}", message),
                LogLevel::Info => tracing::info!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
            },
        }
    }
}

/// Fresh session id from the OS RNG.
fn random_session_id() -> Result<u64, ServerError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).map_err(|e| ServerError::Internal(format!("OS RNG failed: {e}")))?;
    Ok(u64::from_le_bytes(buf))
}
