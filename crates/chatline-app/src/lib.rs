//! Application layer for Chatline
//!
//! Pure state machine and generic runtime for the chat client, so the same
//! orchestration code runs behind the terminal UI and inside tests.
//!
//! # Components
//!
//! - [`App`]: client state machine (name prompt, input line, chat log)
//! - [`Grouper`] and [`ChatLog`]: frame → [`RenderOp`] → displayed groups
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using a [`Driver`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod prompt;
mod render;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{KeyInput, LineEditor};
pub use prompt::{Prompt, PromptKind};
pub use render::{ChatLog, Grouper, RenderOp};
pub use runtime::Runtime;
pub use state::{Author, Bubble, ConnectionState, GroupId, MessageGroup};

/// Server the client connects to unless told otherwise.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8000/ws";
