//! Client → server frames.

use crate::REGISTER_PREFIX;

/// Frames a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// One-time registration of the display name, sent right after open.
    ///
    /// `None` means the name prompt was cancelled. The frame then carries the
    /// bare prefix on purpose: the relay registers an empty name instead of a
    /// placeholder such as `null` that another user could also pick.
    Register {
        /// Display name chosen by the user.
        name: Option<String>,
    },

    /// A chat line. Sent verbatim, no delimiter involved.
    Chat {
        /// Trimmed message text.
        text: String,
    },
}

impl OutboundFrame {
    /// Encode as a text frame.
    pub fn encode(&self) -> String {
        match self {
            Self::Register { name } => {
                format!("{REGISTER_PREFIX}{}", name.as_deref().unwrap_or_default())
            },
            Self::Chat { text } => text.clone(),
        }
    }

    /// Decode a text frame received by the server.
    ///
    /// Anything starting with [`REGISTER_PREFIX`] is a registration; the rest
    /// is returned untouched. Servers decide for themselves when a frame is
    /// expected to be a registration.
    pub fn decode(raw: &str) -> Self {
        match raw.strip_prefix(REGISTER_PREFIX) {
            Some(name) => Self::Register { name: Some(name.to_string()) },
            None => Self::Chat { text: raw.to_string() },
        }
    }
}
