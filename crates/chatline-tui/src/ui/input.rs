//! Input line
//!
//! Displays the message being typed, or the answer to an open prompt with
//! the question as the title.

use chatline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

const PROMPT_WIDTH: u16 = 3; // "> " inside the left border
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (title, editor, color) = match app.prompt() {
        Some(prompt) => (format!(" {} ", prompt.kind.question()), &prompt.answer, Color::Yellow),
        None => (" Message ".to_string(), app.input(), Color::White),
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph =
        Paragraph::new(format!("> {}", editor.text())).style(Style::default().fg(color)).block(block);

    frame.render_widget(paragraph, area);

    // The cursor is a char index; wide glyphs take two cells.
    let text = editor.text();
    let before_cursor =
        text.char_indices().nth(editor.cursor()).map_or(text, |(i, _)| &text[..i]);
    let cursor_width = Span::raw(before_cursor).width();

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = u16::try_from(cursor_width).unwrap_or(u16::MAX).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
