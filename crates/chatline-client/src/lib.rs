//! Chatline client transport.
//!
//! Opens the WebSocket connection used by the chat client and exposes it as a
//! pair of channels. Protocol logic stays in the Sans-IO `chatline-app`
//! state machine; this crate only moves text frames.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod transport;

pub use transport::{ConnectedClient, TransportConfig, TransportError, connect, connect_with_config};
