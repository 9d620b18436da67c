//! Relay core.
//!
//! Sans-IO: the relay consumes [`RelayEvent`]s and returns [`RelayAction`]s
//! for the runtime to execute. It never touches a socket, which keeps the
//! fan-out rules testable without a network.
//!
//! Rules:
//! - The first text frame of a session registers its display name. A leading
//!   [`chatline_proto::REGISTER_PREFIX`] is stripped and surrounding whitespace trimmed.
//! - Every later frame is relayed as `<name>: <text>` to every connected
//!   session, the sender included.
//! - Closing a session unregisters it silently.

use std::net::SocketAddr;

use chatline_proto::{ChatMessage, OutboundFrame};

use crate::registry::{SessionInfo, SessionRegistry};

/// Events that the relay processes.
///
/// These are produced by the runtime (production or test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A new connection completed its WebSocket handshake
    ConnectionAccepted {
        /// Unique session ID assigned by the runtime
        session_id: u64,
        /// Remote address, if known
        peer: Option<SocketAddr>,
    },

    /// A text frame was received from a session
    FrameReceived {
        /// Session that sent the frame
        session_id: u64,
        /// Frame text
        text: String,
    },

    /// A connection was closed (by peer or error)
    ConnectionClosed {
        /// Session that was closed
        session_id: u64,
        /// Reason for closure
        reason: String,
    },
}

/// Actions that the relay produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayAction {
    /// Send a text frame to a specific session
    SendToSession {
        /// Target session ID
        session_id: u64,
        /// Frame text
        text: String,
    },

    /// Log a message (for debugging/monitoring)
    Log {
        /// Log level
        level: LogLevel,
        /// Message to log
        message: String,
    },
}

/// Log levels for relay actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational message
    Info,
    /// Warning
    Warn,
}

/// Action-based chat relay.
#[derive(Debug, Default)]
pub struct Relay {
    registry: SessionRegistry,
}

impl Relay {
    /// Create a relay with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a relay event and return actions to execute.
    pub fn process_event(&mut self, event: RelayEvent) -> Vec<RelayAction> {
        match event {
            RelayEvent::ConnectionAccepted { session_id, peer } => {
                self.handle_connection_accepted(session_id, peer)
            },
            RelayEvent::FrameReceived { session_id, text } => {
                self.handle_frame_received(session_id, &text)
            },
            RelayEvent::ConnectionClosed { session_id, reason } => {
                self.handle_connection_closed(session_id, &reason)
            },
        }
    }

    /// Session registry, for inspection.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    fn handle_connection_accepted(
        &mut self,
        session_id: u64,
        peer: Option<SocketAddr>,
    ) -> Vec<RelayAction> {
        if !self.registry.register_session(session_id, SessionInfo::connected(peer)) {
            return vec![log(LogLevel::Warn, format!("session {session_id} already registered"))];
        }

        let peer = peer.map_or_else(|| "unknown peer".to_string(), |p| p.to_string());
        vec![log(LogLevel::Info, format!("session {session_id} connected from {peer}"))]
    }

    fn handle_frame_received(&mut self, session_id: u64, text: &str) -> Vec<RelayAction> {
        let Some(info) = self.registry.session(session_id) else {
            return vec![log(LogLevel::Warn, format!("frame from unknown session {session_id}"))];
        };

        let Some(name) = info.name.clone() else {
            let name = registration_name(text);
            let message = format!("session {session_id} registered as {name:?}");
            self.registry.set_name(session_id, name);
            return vec![log(LogLevel::Info, message)];
        };

        let relayed = ChatMessage::new(name, text).encode();

        let mut actions = vec![log(LogLevel::Debug, format!("relaying {relayed:?}"))];
        actions.extend(
            self.registry
                .session_ids()
                .map(|id| RelayAction::SendToSession { session_id: id, text: relayed.clone() }),
        );
        actions
    }

    fn handle_connection_closed(&mut self, session_id: u64, reason: &str) -> Vec<RelayAction> {
        match self.registry.unregister_session(session_id) {
            Some(info) => {
                let name = info.name.as_deref().unwrap_or("<unregistered>");
                vec![log(
                    LogLevel::Info,
                    format!("session {session_id} ({name}) disconnected: {reason}"),
                )]
            },
            None => vec![log(LogLevel::Debug, format!("close for unknown session {session_id}"))],
        }
    }
}

/// Extract the display name from a registration frame.
///
/// Clients send `:/<name>`; a frame without the prefix is taken whole.
fn registration_name(text: &str) -> String {
    let raw = match OutboundFrame::decode(text) {
        OutboundFrame::Register { name } => name.unwrap_or_default(),
        OutboundFrame::Chat { text } => text,
    };
    raw.trim().to_string()
}

fn log(level: LogLevel, message: String) -> RelayAction {
    RelayAction::Log { level, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sends(actions: &[RelayAction]) -> Vec<(u64, &str)> {
        actions
            .iter()
            .filter_map(|a| match a {
                RelayAction::SendToSession { session_id, text } => Some((*session_id, text.as_str())),
                RelayAction::Log { .. } => None,
            })
            .collect()
    }

    fn accept(relay: &mut Relay, session_id: u64) {
        relay.process_event(RelayEvent::ConnectionAccepted { session_id, peer: None });
    }

    fn frame(relay: &mut Relay, session_id: u64, text: &str) -> Vec<RelayAction> {
        relay.process_event(RelayEvent::FrameReceived { session_id, text: text.to_string() })
    }

    #[test]
    fn first_frame_registers_without_broadcast() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);

        let actions = frame(&mut relay, 1, ":/ alice ");

        assert!(sends(&actions).is_empty());
        assert_eq!(relay.registry().session(1).unwrap().name.as_deref(), Some("alice"));
    }

    #[test]
    fn registration_without_prefix_uses_whole_frame() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);
        frame(&mut relay, 1, "bob");
        assert_eq!(relay.registry().session(1).unwrap().name.as_deref(), Some("bob"));
    }

    #[test]
    fn bare_prefix_registers_empty_name() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);
        frame(&mut relay, 1, ":/");

        let actions = frame(&mut relay, 1, "hi");
        assert_eq!(sends(&actions), vec![(1, ": hi")]);
    }

    #[test]
    fn chat_is_broadcast_to_everyone_including_sender() {
        let mut relay = Relay::new();
        accept(&mut relay, 2);
        accept(&mut relay, 1);
        accept(&mut relay, 3);
        frame(&mut relay, 1, ":/alice");

        let actions = frame(&mut relay, 1, "hello: world");

        assert_eq!(sends(&actions), vec![
            (1, "alice: hello: world"),
            (2, "alice: hello: world"),
            (3, "alice: hello: world"),
        ]);
    }

    #[test]
    fn registration_prefix_in_later_frames_is_chat() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);
        frame(&mut relay, 1, ":/alice");

        let actions = frame(&mut relay, 1, ":/not a rename");
        assert_eq!(sends(&actions), vec![(1, "alice: :/not a rename")]);
        assert_eq!(relay.registry().session(1).unwrap().name.as_deref(), Some("alice"));
    }

    #[test]
    fn closed_session_no_longer_receives() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);
        accept(&mut relay, 2);
        frame(&mut relay, 1, ":/alice");

        let closed = relay
            .process_event(RelayEvent::ConnectionClosed { session_id: 2, reason: "bye".into() });
        assert!(sends(&closed).is_empty());

        let actions = frame(&mut relay, 1, "still here?");
        assert_eq!(sends(&actions), vec![(1, "alice: still here?")]);
    }

    #[test]
    fn frame_from_unknown_session_is_dropped() {
        let mut relay = Relay::new();
        let actions = frame(&mut relay, 99, "hello");
        assert!(sends(&actions).is_empty());
        assert!(matches!(actions[0], RelayAction::Log { level: LogLevel::Warn, .. }));
    }

    #[test]
    fn duplicate_accept_is_reported() {
        let mut relay = Relay::new();
        accept(&mut relay, 1);
        let actions =
            relay.process_event(RelayEvent::ConnectionAccepted { session_id: 1, peer: None });
        assert!(matches!(actions[0], RelayAction::Log { level: LogLevel::Warn, .. }));
        assert_eq!(relay.registry().len(), 1);
    }
}
