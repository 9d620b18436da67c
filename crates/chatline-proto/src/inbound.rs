//! Server → client frames.

use std::fmt;

use crate::DELIMITER;

/// A chat message relayed by the server.
///
/// # Invariants
///
/// - `sender` never contains [`DELIMITER`]. The split happens at the first
///   occurrence, so everything after it belongs to `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display name of the author, as reported by the server.
    pub sender: String,
    /// Message text. May itself contain the delimiter.
    pub body: String,
}

impl ChatMessage {
    /// Create a message from its parts.
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self { sender: sender.into(), body: body.into() }
    }

    /// Parse a raw inbound frame.
    ///
    /// `"alice: hi: there"` yields sender `alice` and body `hi: there`. A frame
    /// without the delimiter is all sender with an empty body.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(DELIMITER) {
            Some((sender, body)) => Self::new(sender, body),
            None => Self::new(raw, ""),
        }
    }

    /// Encode as it would appear on the wire.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.sender, self.body)
    }
}
