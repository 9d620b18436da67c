//! Observable application state types.
//!
//! These structures are the view model of the client: connection status and
//! the message groups currently on screen.

use std::fmt;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection requested yet (name prompt still open).
    Idle,
    /// Connection in progress.
    Connecting,
    /// Connection open. The only state that permits sending.
    Open,
    /// Connection closed. Never reopened.
    Closed,
}

impl ConnectionState {
    /// Whether frames may be sent.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Who wrote a message, relative to the local user.
///
/// Frontends style the two variants differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// Sender matches the local display name.
    Local,
    /// Anyone else.
    Remote,
}

impl Author {
    /// Classify `sender` against the local display name.
    ///
    /// A cancelled name prompt leaves no display name, so nothing is local.
    pub fn of(sender: &str, display_name: Option<&str>) -> Self {
        if display_name == Some(sender) { Self::Local } else { Self::Remote }
    }
}

/// Identifier of a message group. Unique for the App's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A single rendered message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    /// Message text.
    pub body: String,
}

/// Consecutive messages from one sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Sender shown in the name label.
    pub sender: String,
    /// Styling variant for the label and every bubble.
    pub author: Author,
    /// Bubbles in arrival order. Never empty.
    pub bubbles: Vec<Bubble>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_matches_display_name_exactly() {
        assert_eq!(Author::of("alice", Some("alice")), Author::Local);
        assert_eq!(Author::of("Alice", Some("alice")), Author::Remote);
        assert_eq!(Author::of("", None), Author::Remote);
        assert_eq!(Author::of("", Some("")), Author::Local);
    }

    #[test]
    fn only_open_permits_sending() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Idle.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Closed.is_open());
    }
}
