//! Status bar
//!
//! Displays connection status, the display name and key hints.

use chatline_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const KEY_HINTS: &str = " | Enter send  Ctrl+N new chat  Esc quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Idle => Span::styled("Not connected", Style::default().fg(Color::Gray)),
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Open => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Closed => Span::styled("Disconnected", Style::default().fg(Color::Red)),
    };

    let identity = match app.display_name() {
        Some(name) => format!(" | {name}"),
        None => String::new(),
    };

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::raw(identity),
        Span::styled(KEY_HINTS, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
