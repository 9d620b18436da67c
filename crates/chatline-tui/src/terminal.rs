//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses
//! [`chatline_client`] over WebSocket.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use chatline_app::{App, AppEvent, Driver, KeyInput};
use chatline_client::{ConnectedClient, TransportConfig, TransportError};
use chatline_proto::OutboundFrame;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use crate::ui;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

type PendingConnect = JoinHandle<Result<ConnectedClient, TransportError>>;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A frame was sent before the connection was opened.
    #[error("not connected")]
    NotConnected,

    /// A second connection was requested.
    #[error("already connected")]
    AlreadyConnected,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the WebSocket
/// connection. Holds at most one connection for its whole life. The
/// handshake runs on its own task so keys keep working while it is pending.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    pending_connect: Option<PendingConnect>,
    connection: Option<ConnectedClient>,
    transport: TransportConfig,
}

impl TerminalDriver {
    /// Create a new terminal driver and switch to the alternate screen.
    pub fn new(transport: TransportConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, pending_connect: None, connection: None, transport })
    }
}

/// Convert a crossterm key event to [`KeyInput`].
///
/// Ctrl+letter becomes [`KeyInput::Ctrl`] with the lowercase letter; other
/// modified keys pass through unchanged. Ctrl+Alt is how AltGr arrives on
/// Windows, so it yields the typed character.
pub(crate) fn convert_key(key: KeyEvent) -> Option<KeyInput> {
    let altgr = key.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT);
    if key.modifiers.contains(KeyModifiers::CONTROL) && !altgr {
        if let KeyCode::Char(c) = key.code {
            return Some(KeyInput::Ctrl(c.to_ascii_lowercase()));
        }
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Outcome of the handshake, or pending forever when none is running.
async fn connect_outcome(
    pending: &mut Option<PendingConnect>,
) -> Result<Result<ConnectedClient, TransportError>, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Next inbound frame, or pending forever when there is no connection.
async fn next_frame(connection: &mut Option<ConnectedClient>) -> Option<String> {
    match connection {
        Some(client) => client.recv().await,
        None => std::future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            tokio::select! {
                biased;

                // Terminal events
                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                            if let Some(key_input) = convert_key(key_event) {
                                return Ok(Some(AppEvent::Key(key_input)));
                            }
                        },
                        Some(Ok(Event::Resize(cols, rows))) => {
                            return Ok(Some(AppEvent::Resize(cols, rows)));
                        },
                        Some(Ok(_)) => {},
                        Some(Err(e)) => return Err(TerminalError::Io(e)),
                        None => return Ok(None),
                    }
                }

                // Handshake outcome
                outcome = connect_outcome(&mut self.pending_connect) => {
                    self.pending_connect = None;
                    return Ok(Some(match outcome {
                        Ok(Ok(client)) => {
                            tracing::info!("connected");
                            self.connection = Some(client);
                            AppEvent::Connected
                        },
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "failed to connect");
                            AppEvent::Disconnected { reason: e.to_string() }
                        },
                        Err(e) => AppEvent::Disconnected { reason: e.to_string() },
                    }));
                }

                // Server frames
                frame = next_frame(&mut self.connection) => {
                    match frame {
                        Some(text) => return Ok(Some(AppEvent::FrameReceived { text })),
                        None => {
                            self.connection = None;
                            tracing::info!("server closed the connection");
                            return Ok(Some(AppEvent::Disconnected {
                                reason: "connection closed".to_string(),
                            }));
                        },
                    }
                }

                // Tick timeout
                () = tokio::time::sleep(TICK_INTERVAL) => {
                    return Ok(Some(AppEvent::Tick));
                }
            }
        }
    }

    async fn connect(&mut self, url: &str) -> Result<(), Self::Error> {
        if self.connection.is_some() || self.pending_connect.is_some() {
            return Err(TerminalError::AlreadyConnected);
        }

        tracing::debug!(%url, "connecting");
        let url = url.to_string();
        let config = self.transport.clone();
        self.pending_connect = Some(tokio::spawn(async move {
            chatline_client::connect_with_config(&url, config).await
        }));
        Ok(())
    }

    async fn send_frame(&mut self, frame: OutboundFrame) -> Result<(), Self::Error> {
        let conn = self.connection.as_ref().ok_or(TerminalError::NotConnected)?;
        conn.send(frame.encode()).await?;
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.pending_connect.take() {
            handle.abort();
        }
        if let Some(conn) = self.connection.take() {
            conn.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_keys_pass_through() {
        assert_eq!(convert_key(key(KeyCode::Char('a'), KeyModifiers::NONE)), Some(KeyInput::Char('a')));
        assert_eq!(
            convert_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('A'))
        );
    }

    #[test]
    fn ctrl_letters_become_ctrl_input() {
        assert_eq!(
            convert_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(KeyInput::Ctrl('n'))
        );
        assert_eq!(
            convert_key(key(KeyCode::Char('C'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            Some(KeyInput::Ctrl('c'))
        );
    }

    #[test]
    fn altgr_characters_are_typed_not_dropped() {
        assert_eq!(
            convert_key(key(KeyCode::Char('@'), KeyModifiers::CONTROL | KeyModifiers::ALT)),
            Some(KeyInput::Char('@'))
        );
        assert_eq!(
            convert_key(key(KeyCode::Char('{'), KeyModifiers::CONTROL | KeyModifiers::ALT)),
            Some(KeyInput::Char('{'))
        );
    }

    #[test]
    fn editing_and_navigation_keys_map() {
        let cases = [
            (KeyCode::Enter, KeyInput::Enter),
            (KeyCode::Esc, KeyInput::Esc),
            (KeyCode::Backspace, KeyInput::Backspace),
            (KeyCode::Delete, KeyInput::Delete),
            (KeyCode::Home, KeyInput::Home),
            (KeyCode::End, KeyInput::End),
        ];
        for (code, expected) in cases {
            assert_eq!(convert_key(key(code, KeyModifiers::NONE)), Some(expected));
        }
    }

    #[test]
    fn unsupported_keys_are_dropped() {
        assert_eq!(convert_key(key(KeyCode::F(5), KeyModifiers::NONE)), None);
        assert_eq!(convert_key(key(KeyCode::PageUp, KeyModifiers::NONE)), None);
    }
}
