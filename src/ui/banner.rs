// Banner rendering module
//
// Renders the top banner with the session status, endpoint and the brain's
// current thought.

use crate::app::AppState;
use crate::theme::{status_color, AXON_BLUE, GLIA_GREY, SYNAPSE_VIOLET};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let status = app.session.status();

    let banner_text = vec![
        Line::from(vec![
            Span::styled(
                " ◉ BRAINSCOPE ",
                Style::default()
                    .fg(SYNAPSE_VIOLET)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [", Style::default().fg(GLIA_GREY)),
            Span::styled(
                status.label(),
                Style::default()
                    .fg(status_color(status))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("] ", Style::default().fg(GLIA_GREY)),
            Span::styled(
                app.session.endpoint().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled(" thought: ", Style::default().fg(GLIA_GREY)),
            Span::styled(
                app.session.brain().thought.clone(),
                Style::default()
                    .fg(AXON_BLUE)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
    ];

    let banner = Paragraph::new(banner_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SYNAPSE_VIOLET)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}
