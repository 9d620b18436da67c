//! Modal questions asked of the user.
//!
//! A prompt suspends normal input handling until it is answered or
//! cancelled. Frames that arrive in the meantime are queued by the
//! [`crate::App`] and handled once the prompt resolves.

use crate::LineEditor;

/// What a prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Display name, asked once at startup.
    DisplayName,
    /// Name of a new chat, asked when the transcript is reset.
    ChatName,
}

impl PromptKind {
    /// Question shown to the user.
    pub fn question(self) -> &'static str {
        match self {
            Self::DisplayName => "Enter your name:",
            Self::ChatName => "Enter the name of the new chat:",
        }
    }
}

/// An open prompt and the answer typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// What is being asked.
    pub kind: PromptKind,
    /// Answer being typed.
    pub answer: LineEditor,
}

impl Prompt {
    /// Open a prompt with an empty answer.
    pub fn new(kind: PromptKind) -> Self {
        Self { kind, answer: LineEditor::new() }
    }
}
