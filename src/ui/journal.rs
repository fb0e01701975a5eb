// Journal (event log) rendering module
//
// Renders the tail of the session's event log, newest at the bottom, with
// origin-based coloring.

use crate::app::AppState;
use crate::stream::StreamEvent;
use crate::theme::{event_color, AXON_BLUE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

fn journal_line(event: &StreamEvent) -> Line<'_> {
    let color = event_color(event.kind);
    Line::from(vec![
        Span::styled(
            format!("{:>7} ", event.kind.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(event.text.as_str(), Style::default().fg(color)),
    ])
}

pub fn render_journal(f: &mut Frame, area: Rect, app: &AppState) {
    let events = app.session.events();

    // Only the newest lines that fit inside the border
    let visible = area.height.saturating_sub(2) as usize;
    let skip = events.len().saturating_sub(visible);

    let items: Vec<ListItem> = events
        .iter()
        .skip(skip)
        .map(|event| ListItem::new(journal_line(event)))
        .collect();

    let title = format!("━ 📜 Journal ({}) ", events.len());

    let journal = List::new(items).block(
        Block::default()
            .title(vec![
                Span::styled(
                    title,
                    Style::default().fg(AXON_BLUE).add_modifier(Modifier::BOLD),
                ),
                Span::styled("━━━━━━━", Style::default().fg(AXON_BLUE)),
            ])
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(AXON_BLUE)),
    );

    f.render_widget(journal, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::EventKind;

    #[test]
    fn test_journal_line_colors_by_origin() {
        let event = StreamEvent::new(EventKind::Chat, "hello");
        let line = journal_line(&event);
        assert_eq!(line.spans[0].content, "   chat ");
        assert_eq!(line.spans[1].content, "hello");
        assert_eq!(line.spans[1].style.fg, Some(event_color(EventKind::Chat)));
    }
}
