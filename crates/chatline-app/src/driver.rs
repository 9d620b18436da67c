//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use chatline_proto::OutboundFrame;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal UI and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite for WebSocket
/// - **Tests**: scripted events, recorded frames
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Multiplexes user input, inbound frames, connection progress and
    /// ticks. The outcome of [`Driver::connect`] is reported here as
    /// [`AppEvent::Connected`] or [`AppEvent::Disconnected`], as is a closed
    /// connection. Returns `None` once the input source is exhausted, which
    /// ends the runtime.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start opening the connection to the server.
    ///
    /// Must return without waiting for the handshake so input keeps flowing
    /// while connecting. The outcome arrives through [`Driver::poll_event`].
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot be started at all.
    fn connect(&mut self, url: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a frame to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the send fails.
    fn send_frame(
        &mut self,
        frame: OutboundFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
