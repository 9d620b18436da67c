//! Chatline wire format
//!
//! Every frame on the wire is a single WebSocket text message. There is no
//! binary header and no envelope; the structure lives entirely in the text:
//!
//! - Client → server registration: `:/<display name>`, sent once after open.
//! - Client → server chat: the trimmed input text, verbatim.
//! - Server → client: `<sender>: <body>`, split on the first `": "`.
//!
//! Parsing never fails. A frame that does not match the expected shape
//! degrades to the closest interpretation (see [`ChatMessage::parse`] and
//! [`OutboundFrame::decode`]).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod inbound;
mod outbound;

pub use inbound::ChatMessage;
pub use outbound::OutboundFrame;

/// Separator between sender and body in server → client frames.
pub const DELIMITER: &str = ": ";

/// Prefix that marks a client → server registration frame.
pub const REGISTER_PREFIX: &str = ":/";
