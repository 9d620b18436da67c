//! Server error types.

use thiserror::Error;

/// Errors that can occur in the server runtime.
///
/// The relay core is infallible; everything here comes from real I/O.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (bind address unusable, etc.).
    ///
    /// Fatal at startup. Fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport/network error (accept failure, socket I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// WebSocket upgrade failed. Fatal for that connection only.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// Internal error (OS randomness unavailable, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
