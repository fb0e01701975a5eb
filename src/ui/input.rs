// Input line rendering module

use crate::app::AppState;
use crate::stream::SessionStatus;
use crate::theme::{GLIA_GREY, MYELIN_GREEN};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";

/// Terminal column of the cursor after `text`, kept inside the border
fn cursor_column(area: Rect, text: &str) -> u16 {
    let offset = (PROMPT.width() + text.width()) as u16;
    let max = area.width.saturating_sub(2);
    area.x + 1 + offset.min(max.saturating_sub(1))
}

pub fn render_input(f: &mut Frame, area: Rect, app: &AppState) {
    let connected = app.session.status() == SessionStatus::Connected;
    let border_color = if connected {
        MYELIN_GREEN
    } else {
        Color::DarkGray
    };
    let text = app.input.as_str();

    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(border_color)),
        Span::styled(text, Style::default().fg(GLIA_GREY)),
    ]);

    let input = Paragraph::new(line).block(
        Block::default()
            .title(Span::styled(
                " Talk to the brain ",
                Style::default().fg(border_color),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );

    f.render_widget(input, area);

    if area.width > 2 && area.height > 2 {
        f.set_cursor_position(Position::new(cursor_column(area, text), area.y + 1));
    }
}
