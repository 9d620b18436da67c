//! Chat area
//!
//! Displays the message groups. Each group is a bold sender label followed
//! by its bubbles, indented toward the group's side of the screen.

use chatline_app::{App, Author, MessageGroup};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const BORDER_SIZE: u16 = 2;
const BUBBLE_INDENT: &str = "  ";

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Chatline ");

    let lines: Vec<Line> = if app.chat_log().is_empty() {
        vec![Line::from(Span::styled("No messages yet", Style::default().fg(Color::DarkGray)))]
    } else {
        app.chat_log().groups().iter().flat_map(group_lines).collect()
    };

    // Long bubbles wrap; keep the newest wrapped rows in view.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let inner_width = area.width.saturating_sub(BORDER_SIZE);
    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = paragraph.line_count(inner_width).saturating_sub(visible_height);
    let scroll = u16::try_from(skip).unwrap_or(u16::MAX);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

fn group_lines(group: &MessageGroup) -> Vec<Line<'_>> {
    let (color, alignment) = match group.author {
        Author::Local => (Color::Cyan, Alignment::Right),
        Author::Remote => (Color::Green, Alignment::Left),
    };

    let label = Line::from(Span::styled(
        group.sender.as_str(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(alignment);

    let bubbles = group.bubbles.iter().map(move |bubble| {
        let text = match group.author {
            Author::Local => format!("{}{BUBBLE_INDENT}", bubble.body),
            Author::Remote => format!("{BUBBLE_INDENT}{}", bubble.body),
        };
        Line::from(Span::styled(text, Style::default().fg(color))).alignment(alignment)
    });

    std::iter::once(label).chain(bubbles).collect()
}
