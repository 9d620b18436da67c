//! Fuzz target for text frame parsing
//!
//! # Invariants
//!
//! - Parsing never panics, whatever the input
//! - The sender never contains the delimiter
//! - Re-encoding a frame that contained the delimiter reproduces it exactly
//! - Decoding a client frame never loses text

#![no_main]

use chatline_proto::{ChatMessage, DELIMITER, OutboundFrame, REGISTER_PREFIX};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw: &str| {
    let message = ChatMessage::parse(raw);
    assert!(!message.sender.contains(DELIMITER));

    if raw.contains(DELIMITER) {
        assert_eq!(message.encode(), raw);
    } else {
        assert_eq!(message.sender, raw);
        assert!(message.body.is_empty());
    }

    match OutboundFrame::decode(raw) {
        OutboundFrame::Register { name } => {
            assert_eq!(format!("{REGISTER_PREFIX}{}", name.unwrap_or_default()), raw);
        },
        OutboundFrame::Chat { text } => assert_eq!(text, raw),
    }
});
