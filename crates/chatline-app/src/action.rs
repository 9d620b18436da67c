//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use chatline_proto::OutboundFrame;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Start opening the connection to the server. The driver reports the
    /// outcome as [`crate::AppEvent::Connected`] or
    /// [`crate::AppEvent::Disconnected`].
    Connect {
        /// WebSocket URL (`ws://` or `wss://`).
        server_url: String,
    },

    /// Send a frame over the open connection.
    SendFrame {
        /// Frame to transmit.
        frame: OutboundFrame,
    },
}
