//! Property-based tests for inbound frame parsing.
//!
//! These tests verify the split rules hold for ALL inputs, not just the
//! handful of examples in the unit tests.

use chatline_proto::{ChatMessage, DELIMITER, OutboundFrame};
use proptest::prelude::*;

/// Strategy for sender names that cannot contain the delimiter.
fn sender_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _:.-]{0,16}".prop_filter("sender must not contain delimiter", |s| {
        !s.contains(DELIMITER) && !s.ends_with(':')
    })
}

proptest! {
    #[test]
    fn prop_parse_never_panics(raw in ".*") {
        let _ = ChatMessage::parse(&raw);
    }

    #[test]
    fn prop_sender_never_contains_delimiter(raw in ".*") {
        let msg = ChatMessage::parse(&raw);
        prop_assert!(!msg.sender.contains(DELIMITER));
    }

    #[test]
    fn prop_body_keeps_every_delimiter(sender in sender_strategy(), parts in prop::collection::vec("[a-z ]{0,8}", 1..5)) {
        let body = parts.join(DELIMITER);
        let raw = format!("{sender}{DELIMITER}{body}");

        let msg = ChatMessage::parse(&raw);

        prop_assert_eq!(msg.sender, sender);
        prop_assert_eq!(msg.body, body);
    }

    #[test]
    fn prop_parse_then_encode_restores_frames_with_delimiter(raw in ".*: .*") {
        let msg = ChatMessage::parse(&raw);
        prop_assert_eq!(msg.encode(), raw);
    }

    #[test]
    fn prop_registration_decodes_to_its_name(name in "[^\\n]{0,32}") {
        let encoded = OutboundFrame::Register { name: Some(name.clone()) }.encode();
        prop_assert_eq!(OutboundFrame::decode(&encoded), OutboundFrame::Register { name: Some(name) });
    }
}
