//! Frame → render instruction → chat log.
//!
//! Grouping is split in two halves so the decision can be tested without a
//! display:
//!
//! - [`Grouper`] decides, per incoming message, whether a new group starts or
//!   the current one grows. It owns the "last sender" tracking and nothing
//!   else.
//! - [`ChatLog`] applies the resulting [`RenderOp`]s to the groups on screen.
//!
//! Clearing the log does not touch the grouper. After a reset, a message from
//! the previous sender is appended to the group that was just removed and
//! therefore does not show up.

use chatline_proto::ChatMessage;

use crate::{Author, Bubble, GroupId, MessageGroup};

/// Instruction for the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Start a new group with a name label and its first bubble.
    StartGroup {
        /// New group identifier.
        id: GroupId,
        /// Sender for the name label.
        sender: String,
        /// Styling variant.
        author: Author,
        /// First bubble text.
        body: String,
    },

    /// Append a bubble to an existing group.
    AppendBubble {
        /// Target group.
        id: GroupId,
        /// Bubble text.
        body: String,
    },

    /// Remove every group.
    Clear,
}

/// Tracks the last sender and decides how each message is placed.
#[derive(Debug, Clone, Default)]
pub struct Grouper {
    /// Sender of the most recently placed message.
    last_sender: Option<String>,
    /// Group that message went into.
    current: Option<GroupId>,
    /// Next group identifier to hand out.
    next_id: u64,
}

impl Grouper {
    /// Create a grouper that has seen no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide where `message` goes.
    ///
    /// A new group starts when there is no previous sender, the previous
    /// sender was empty, or the sender changed.
    pub fn place(&mut self, message: ChatMessage, display_name: Option<&str>) -> RenderOp {
        let ChatMessage { sender, body } = message;

        let continues = self
            .last_sender
            .as_deref()
            .is_some_and(|last| !last.is_empty() && last == sender);

        if continues {
            if let Some(id) = self.current {
                return RenderOp::AppendBubble { id, body };
            }
        }

        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.current = Some(id);
        self.last_sender = Some(sender.clone());

        let author = Author::of(&sender, display_name);
        RenderOp::StartGroup { id, sender, author, body }
    }

    /// Sender of the most recently placed message.
    pub fn last_sender(&self) -> Option<&str> {
        self.last_sender.as_deref()
    }

    /// Group the most recent message went into.
    pub fn current_group(&self) -> Option<GroupId> {
        self.current
    }
}

/// Message groups currently displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    groups: Vec<MessageGroup>,
}

impl ChatLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a render instruction.
    ///
    /// Returns `false` if the instruction changed nothing visible, which only
    /// happens when appending to a group that is no longer displayed.
    pub fn apply(&mut self, op: RenderOp) -> bool {
        match op {
            RenderOp::StartGroup { id, sender, author, body } => {
                self.groups.push(MessageGroup {
                    id,
                    sender,
                    author,
                    bubbles: vec![Bubble { body }],
                });
                true
            },
            RenderOp::AppendBubble { id, body } => {
                // The target is almost always the last group.
                match self.groups.iter_mut().rev().find(|g| g.id == id) {
                    Some(group) => {
                        group.bubbles.push(Bubble { body });
                        true
                    },
                    None => false,
                }
            },
            RenderOp::Clear => {
                self.groups.clear();
                true
            },
        }
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[MessageGroup] {
        &self.groups
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of bubbles across all groups.
    pub fn bubble_count(&self) -> usize {
        self.groups.iter().map(|g| g.bubbles.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(senders: &[&str], display_name: Option<&str>) -> ChatLog {
        let mut grouper = Grouper::new();
        let mut log = ChatLog::new();
        for (i, sender) in senders.iter().enumerate() {
            let op = grouper.place(ChatMessage::new(*sender, format!("m{i}")), display_name);
            log.apply(op);
        }
        log
    }

    #[test]
    fn consecutive_senders_share_a_group() {
        let log = feed(&["X", "X", "Y", "X"], None);

        let counts: Vec<_> = log.groups().iter().map(|g| g.bubbles.len()).collect();
        assert_eq!(counts, vec![2, 1, 1]);

        let senders: Vec<_> = log.groups().iter().map(|g| g.sender.as_str()).collect();
        assert_eq!(senders, vec!["X", "Y", "X"]);
    }

    #[test]
    fn first_message_starts_group() {
        let mut grouper = Grouper::new();
        let op = grouper.place(ChatMessage::new("a", "hi"), None);
        assert!(matches!(op, RenderOp::StartGroup { id: GroupId(0), .. }));
        assert_eq!(grouper.last_sender(), Some("a"));
    }

    #[test]
    fn empty_sender_always_starts_new_group() {
        let log = feed(&["", "", ""], None);
        assert_eq!(log.groups().len(), 3);
    }

    #[test]
    fn local_sender_gets_local_variant() {
        let log = feed(&["me", "you", "me"], Some("me"));
        let authors: Vec<_> = log.groups().iter().map(|g| g.author).collect();
        assert_eq!(authors, vec![Author::Local, Author::Remote, Author::Local]);
    }

    #[test]
    fn clear_empties_log_but_not_grouper() {
        let mut grouper = Grouper::new();
        let mut log = ChatLog::new();
        log.apply(grouper.place(ChatMessage::new("a", "1"), None));
        log.apply(grouper.place(ChatMessage::new("b", "2"), None));

        assert!(log.apply(RenderOp::Clear));
        assert!(log.is_empty());
        assert_eq!(grouper.last_sender(), Some("b"));

        // Same sender continues the detached group: nothing visible.
        let op = grouper.place(ChatMessage::new("b", "3"), None);
        assert!(matches!(op, RenderOp::AppendBubble { .. }));
        assert!(!log.apply(op));
        assert!(log.is_empty());

        // A different sender shows up again.
        assert!(log.apply(grouper.place(ChatMessage::new("c", "4"), None)));
        assert_eq!(log.groups().len(), 1);
    }

    #[test]
    fn group_ids_are_unique() {
        let log = feed(&["a", "b", "a", "b"], None);
        let mut ids: Vec<_> = log.groups().iter().map(|g| g.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
