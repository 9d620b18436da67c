//! Fuzz target for the relay core
//!
//! # Invariants
//!
//! - No event sequence panics
//! - A relayed line goes to every open session exactly once
//! - Nothing is ever sent to a closed session

#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use chatline_server::{Relay, RelayAction, RelayEvent};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    Accept(u8),
    Frame(u8, String),
    Close(u8),
}

fuzz_target!(|steps: Vec<Step>| {
    let mut relay = Relay::new();
    let mut open = BTreeSet::new();

    for step in steps {
        let event = match step {
            Step::Accept(id) => {
                open.insert(u64::from(id));
                RelayEvent::ConnectionAccepted { session_id: u64::from(id), peer: None }
            },
            Step::Frame(id, text) => RelayEvent::FrameReceived { session_id: u64::from(id), text },
            Step::Close(id) => {
                open.remove(&u64::from(id));
                RelayEvent::ConnectionClosed { session_id: u64::from(id), reason: "fuzz".into() }
            },
        };

        let targets: Vec<u64> = relay
            .process_event(event)
            .into_iter()
            .filter_map(|action| match action {
                RelayAction::SendToSession { session_id, .. } => Some(session_id),
                RelayAction::Log { .. } => None,
            })
            .collect();

        if !targets.is_empty() {
            assert_eq!(targets, open.iter().copied().collect::<Vec<_>>());
        }
    }
});
