//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keyboard, resize) and system ticks.
//! - Connection notifications from the transport.

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection is open.
    Connected,

    /// Text frame received from the server.
    FrameReceived {
        /// Raw frame text, `<sender>: <body>`.
        text: String,
    },

    /// Connection closed or could not be established.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },
}
