//! Fuzz target for the client state machine
//!
//! Drives [`App`] with arbitrary key presses, frames and connection changes.
//!
//! # Invariants
//!
//! - No event sequence panics
//! - Adjacent groups never share a sender
//! - Nothing is sent unless the connection is open
//! - Only the display name is rendered as local

#![no_main]

use arbitrary::Arbitrary;
use chatline_app::{App, AppAction, AppEvent, Author, KeyInput};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    Type(char),
    Enter,
    Esc,
    Backspace,
    NewChat,
    Connected,
    Disconnected,
    Frame { sender: u8, body: String },
}

#[derive(Debug, Arbitrary)]
struct Session {
    ask_name: bool,
    steps: Vec<Step>,
}

const SENDERS: [&str; 4] = ["me", "ann", "bo", ""];

fuzz_target!(|session: Session| {
    let mut app = if session.ask_name {
        App::new("ws://fuzz/ws".into())
    } else {
        App::with_display_name("ws://fuzz/ws".into(), "me".into())
    };
    let _ = app.start();

    for step in session.steps {
        let event = match step {
            Step::Type(c) => AppEvent::Key(KeyInput::Char(c)),
            Step::Enter => AppEvent::Key(KeyInput::Enter),
            Step::Esc => AppEvent::Key(KeyInput::Esc),
            Step::Backspace => AppEvent::Key(KeyInput::Backspace),
            Step::NewChat => AppEvent::Key(KeyInput::Ctrl('n')),
            Step::Connected => AppEvent::Connected,
            Step::Disconnected => AppEvent::Disconnected { reason: "fuzz".into() },
            Step::Frame { sender, body } => {
                let sender = SENDERS[usize::from(sender) % SENDERS.len()];
                AppEvent::FrameReceived { text: format!("{sender}: {body}") }
            },
        };

        let was_open = app.connection_state().is_open();
        let actions = app.handle(event);
        if !was_open {
            // Only the registration may go out when the connection opens.
            let chats = actions
                .iter()
                .filter(|a| {
                    matches!(
                        a,
                        AppAction::SendFrame { frame: chatline_proto::OutboundFrame::Chat { .. } }
                    )
                })
                .count();
            assert_eq!(chats, 0);
        }
        if actions.iter().any(|a| matches!(a, AppAction::Quit)) {
            break;
        }
    }

    for pair in app.chat_log().groups().windows(2) {
        assert!(pair[0].sender.is_empty() || pair[0].sender != pair[1].sender);
    }
    for group in app.chat_log().groups() {
        let local = app.display_name() == Some(group.sender.as_str());
        assert_eq!(group.author == Author::Local, local);
    }
});
