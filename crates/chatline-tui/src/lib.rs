//! Terminal UI for Chatline
//!
//! A thin shell over [`chatline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`chatline_app::Runtime`]
//!
//! This crate only handles terminal rendering and the socket hookup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use chatline_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
