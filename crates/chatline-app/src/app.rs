//! Application state machine.
//!
//! This module defines the [`App`] state machine, which holds the whole
//! per-session state of the chat client, completely decoupled from I/O.
//!
//! It consumes [`crate::AppEvent`] inputs and produces [`crate::AppAction`]
//! instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Asks for the display name and connects once it is known.
//! - Sends the registration frame when the connection opens.
//! - Groups incoming frames into the chat log.
//! - Sends the input line when the connection is open.
//! - Clears the chat log on "new chat".

use std::collections::VecDeque;

use chatline_proto::{ChatMessage, OutboundFrame};

use crate::{
    AppAction, AppEvent, ChatLog, ConnectionState, Grouper, KeyInput, LineEditor, Prompt,
    PromptKind, RenderOp,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a terminal or a socket.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// Server URL to connect to once the display name is known.
    server_url: String,
    /// Display name. `None` until answered, and after a cancelled prompt.
    display_name: Option<String>,
    /// Registration frame already sent.
    registered: bool,
    /// Open prompt. `None` when input goes to the chat line.
    prompt: Option<Prompt>,
    /// Chat input line.
    input: LineEditor,
    /// Last-sender tracking.
    grouper: Grouper,
    /// Groups on screen.
    chat_log: ChatLog,
    /// Frames received while a prompt was open, in arrival order.
    deferred: VecDeque<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create an App that starts by asking for the display name.
    pub fn new(server_url: String) -> Self {
        Self {
            state: ConnectionState::Idle,
            server_url,
            display_name: None,
            registered: false,
            prompt: Some(Prompt::new(PromptKind::DisplayName)),
            input: LineEditor::new(),
            grouper: Grouper::new(),
            chat_log: ChatLog::new(),
            deferred: VecDeque::new(),
            terminal_size: (80, 24),
        }
    }

    /// Create an App whose display name is already known.
    pub fn with_display_name(server_url: String, display_name: String) -> Self {
        let mut app = Self::new(server_url);
        app.prompt = None;
        app.display_name = Some(display_name);
        app
    }

    /// Actions to run at startup.
    ///
    /// Connects right away if the display name is known, otherwise waits for
    /// the name prompt.
    pub fn start(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() { vec![AppAction::Render] } else { self.connect() }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connected => self.handle_connected(),
            AppEvent::FrameReceived { text } => self.on_frame_received(text),
            AppEvent::Disconnected { reason } => {
                self.state = ConnectionState::Closed;
                tracing::info!(%reason, "connection closed");
                vec![AppAction::Render]
            },
        }
    }

    /// Handle a raw frame from the server.
    ///
    /// Deferred while a prompt is open.
    pub fn on_frame_received(&mut self, raw: String) -> Vec<AppAction> {
        if self.prompt.is_some() {
            self.deferred.push_back(raw);
            return vec![];
        }

        self.render_frame(&raw);
        vec![AppAction::Render]
    }

    /// Send the input line.
    ///
    /// Requires non-empty trimmed input and an open connection. Input is
    /// kept when the connection is not open.
    pub fn send_message(&mut self) -> Vec<AppAction> {
        if !self.state.is_open() {
            tracing::warn!(state = ?self.state, "connection is not open, message not sent");
            return vec![];
        }

        let text = self.input.text().trim();
        if text.is_empty() {
            return vec![];
        }

        let frame = OutboundFrame::Chat { text: text.to_string() };
        self.input.clear();
        vec![AppAction::SendFrame { frame }, AppAction::Render]
    }

    /// Ask for a chat name, then clear the chat log.
    pub fn start_new_chat(&mut self) -> Vec<AppAction> {
        self.prompt = Some(Prompt::new(PromptKind::ChatName));
        vec![AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Handle keyboard input.
    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Ctrl('c') {
            return self.quit();
        }

        if let Some(prompt) = self.prompt.as_mut() {
            if prompt.answer.edit(key) {
                return vec![AppAction::Render];
            }
            return match key {
                KeyInput::Enter => {
                    let answer = prompt.answer.take();
                    self.resolve_prompt(Some(answer))
                },
                KeyInput::Esc => self.resolve_prompt(None),
                _ => vec![],
            };
        }

        if self.input.edit(key) {
            return vec![AppAction::Render];
        }

        match key {
            KeyInput::Enter => self.send_message(),
            KeyInput::Ctrl('n') => self.start_new_chat(),
            KeyInput::Esc => self.quit(),
            _ => vec![],
        }
    }

    /// Close the open prompt with `answer` (`None` if cancelled) and resume.
    fn resolve_prompt(&mut self, answer: Option<String>) -> Vec<AppAction> {
        let Some(prompt) = self.prompt.take() else {
            return vec![];
        };

        let mut actions = match prompt.kind {
            PromptKind::DisplayName => {
                tracing::debug!(name = ?answer, "display name chosen");
                self.display_name = answer;
                self.connect()
            },
            PromptKind::ChatName => {
                tracing::debug!(chat = ?answer, "starting new chat");
                self.chat_log.apply(RenderOp::Clear);
                vec![AppAction::Render]
            },
        };

        if !self.deferred.is_empty() {
            while let Some(raw) = self.deferred.pop_front() {
                self.render_frame(&raw);
            }
            actions.push(AppAction::Render);
        }

        actions
    }

    /// Request the connection.
    ///
    /// Renders first so the connecting state is on screen while the driver
    /// works.
    fn connect(&mut self) -> Vec<AppAction> {
        self.state = ConnectionState::Connecting;
        vec![AppAction::Render, AppAction::Connect { server_url: self.server_url.clone() }]
    }

    /// Connection opened: register once.
    fn handle_connected(&mut self) -> Vec<AppAction> {
        self.state = ConnectionState::Open;
        tracing::info!(server_url = %self.server_url, "connected");

        if self.registered {
            return vec![AppAction::Render];
        }
        self.registered = true;

        let frame = OutboundFrame::Register { name: self.display_name.clone() };
        vec![AppAction::SendFrame { frame }, AppAction::Render]
    }

    /// Parse a frame and apply it to the chat log.
    fn render_frame(&mut self, raw: &str) {
        let message = ChatMessage::parse(raw);
        tracing::debug!(sender = %message.sender, body = %message.body, "frame received");

        let op = self.grouper.place(message, self.display_name.as_deref());
        if !self.chat_log.apply(op) {
            tracing::debug!("bubble appended to a group no longer displayed");
        }
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Display name. `None` before the prompt is answered or if it was
    /// cancelled.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Open prompt, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Chat input line.
    pub fn input(&self) -> &LineEditor {
        &self.input
    }

    /// Groups on screen.
    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }

    /// Last-sender tracking.
    pub fn grouper(&self) -> &Grouper {
        &self.grouper
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_app(name: &str) -> App {
        let mut app = App::with_display_name("ws://localhost:8000/ws".into(), name.into());
        let _ = app.start();
        let _ = app.handle(AppEvent::Connected);
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn starts_with_name_prompt_and_no_connection() {
        let mut app = App::new("ws://localhost:8000/ws".into());
        let actions = app.start();

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.prompt().map(|p| p.kind), Some(PromptKind::DisplayName));
        assert_eq!(app.connection_state(), ConnectionState::Idle);
    }

    #[test]
    fn answering_name_prompt_connects() {
        let mut app = App::new("ws://localhost:8000/ws".into());
        type_text(&mut app, "alice");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(matches!(actions.as_slice(), [AppAction::Render, AppAction::Connect { .. }]));
        assert_eq!(app.display_name(), Some("alice"));
        assert_eq!(app.connection_state(), ConnectionState::Connecting);
        assert!(app.prompt().is_none());
    }

    #[test]
    fn empty_name_is_accepted() {
        let mut app = App::new("ws://localhost:8000/ws".into());
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        assert_eq!(app.display_name(), Some(""));
    }

    #[test]
    fn cancelled_name_prompt_still_connects_without_name() {
        let mut app = App::new("ws://localhost:8000/ws".into());
        type_text(&mut app, "bob");

        let actions = app.handle(AppEvent::Key(KeyInput::Esc));

        assert!(actions.iter().any(|a| matches!(a, AppAction::Connect { .. })));
        assert_eq!(app.display_name(), None);
    }

    #[test]
    fn open_sends_registration_once() {
        let mut app = App::with_display_name("ws://x".into(), "alice".into());
        let _ = app.start();

        let actions = app.handle(AppEvent::Connected);
        assert_eq!(actions, vec![
            AppAction::SendFrame {
                frame: OutboundFrame::Register { name: Some("alice".into()) }
            },
            AppAction::Render
        ]);

        let again = app.handle(AppEvent::Connected);
        assert_eq!(again, vec![AppAction::Render]);
    }

    #[test]
    fn enter_sends_trimmed_text_and_clears_input() {
        let mut app = open_app("alice");
        type_text(&mut app, "  hello  ");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![
            AppAction::SendFrame { frame: OutboundFrame::Chat { text: "hello".into() } },
            AppAction::Render
        ]);
        assert!(app.input().is_empty());
    }

    #[test]
    fn whitespace_only_input_is_not_sent() {
        let mut app = open_app("alice");
        type_text(&mut app, "   ");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(actions.is_empty());
        assert_eq!(app.input().text(), "   ");
    }

    #[test]
    fn send_while_closed_keeps_input() {
        let mut app = open_app("alice");
        let _ = app.handle(AppEvent::Disconnected { reason: "bye".into() });
        type_text(&mut app, "hello");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(actions.is_empty());
        assert_eq!(app.input().text(), "hello");
        assert_eq!(app.connection_state(), ConnectionState::Closed);
    }

    #[test]
    fn send_while_connecting_is_skipped() {
        let mut app = App::with_display_name("ws://x".into(), "alice".into());
        let _ = app.start();
        type_text(&mut app, "early");

        assert!(app.handle(AppEvent::Key(KeyInput::Enter)).is_empty());
        assert_eq!(app.input().text(), "early");
    }

    #[test]
    fn frames_are_grouped_by_sender() {
        let mut app = open_app("alice");
        for raw in ["bob: hi", "bob: there", "alice: hey", "bob: ok"] {
            let _ = app.handle(AppEvent::FrameReceived { text: raw.into() });
        }

        let counts: Vec<_> = app.chat_log().groups().iter().map(|g| g.bubbles.len()).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(app.chat_log().groups()[1].author, crate::Author::Local);
    }

    #[test]
    fn new_chat_prompts_then_clears_log() {
        let mut app = open_app("alice");
        let _ = app.handle(AppEvent::FrameReceived { text: "bob: hi".into() });

        let _ = app.handle(AppEvent::Key(KeyInput::Ctrl('n')));
        assert_eq!(app.prompt().map(|p| p.kind), Some(PromptKind::ChatName));
        assert_eq!(app.chat_log().groups().len(), 1);

        type_text(&mut app, "standup");
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(app.chat_log().is_empty());
        assert!(app.prompt().is_none());
        assert_eq!(app.connection_state(), ConnectionState::Open);
    }

    #[test]
    fn cancelled_new_chat_still_clears_log() {
        let mut app = open_app("alice");
        let _ = app.handle(AppEvent::FrameReceived { text: "bob: hi".into() });

        let _ = app.handle(AppEvent::Key(KeyInput::Ctrl('n')));
        let _ = app.handle(AppEvent::Key(KeyInput::Esc));

        assert!(app.chat_log().is_empty());
    }

    #[test]
    fn new_chat_keeps_chat_input() {
        let mut app = open_app("alice");
        type_text(&mut app, "draft");

        let _ = app.handle(AppEvent::Key(KeyInput::Ctrl('n')));
        type_text(&mut app, "room");
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(app.input().text(), "draft");
    }

    #[test]
    fn frames_during_prompt_are_deferred_until_resolved() {
        let mut app = open_app("alice");
        let _ = app.handle(AppEvent::Key(KeyInput::Ctrl('n')));

        let actions = app.handle(AppEvent::FrameReceived { text: "bob: queued".into() });
        assert!(actions.is_empty());
        assert!(app.chat_log().is_empty());

        let _ = app.handle(AppEvent::Key(KeyInput::Enter));

        let groups = app.chat_log().groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].bubbles[0].body, "queued");
    }

    #[test]
    fn esc_quits_outside_prompt() {
        let mut app = open_app("alice");
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn ctrl_c_quits_even_during_prompt() {
        let mut app = App::new("ws://x".into());
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Ctrl('c'))), vec![AppAction::Quit]);
    }
}
