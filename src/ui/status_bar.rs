// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, frame timing and
// toggle indicators.

use crate::app::AppState;
use crate::theme::{CORTEX_AMBER, GLIA_GREY, MYELIN_GREEN, SPIKE_RED, SYNAPSE_VIOLET};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
}

const HINTS: [Hint; 3] = [
    Hint {
        priority: 1,
        key: "Esc:",
        desc: "Quit | ",
    },
    Hint {
        priority: 1,
        key: "Enter:",
        desc: "Send | ",
    },
    Hint {
        priority: 2,
        key: "Ctrl+C:",
        desc: "Quit | ",
    },
];

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    // Available width for hints, minus borders and icon
    let available_width = area.width.saturating_sub(4) as usize;

    let mut spans = vec![Span::styled(" ◉ ", Style::default().fg(SYNAPSE_VIOLET))];
    let mut current_length = 3;

    for priority in 1..=2 {
        for hint in HINTS.iter().filter(|hint| hint.priority == priority) {
            let hint_length = hint.key.len() + hint.desc.len();
            if current_length + hint_length <= available_width {
                spans.push(Span::styled(
                    hint.key,
                    Style::default()
                        .fg(SYNAPSE_VIOLET)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.extend(build_frame_indicators(app));
    spans.push(Span::raw(" "));
    spans.extend(build_toggle_indicators(app));

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SYNAPSE_VIOLET)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// Target fps, last frame time and a warning once the loop runs slow
fn build_frame_indicators(app: &AppState) -> Vec<Span<'static>> {
    let stats = &app.frame_stats;
    let frame_color = if stats.running_slow {
        SPIKE_RED
    } else {
        GLIA_GREY
    };

    let mut spans = vec![Span::styled(
        format!(
            "{}fps {}ms {}n",
            app.frame_config.fps,
            stats.last_frame_ms,
            app.pool().len()
        ),
        Style::default().fg(frame_color),
    )];
    if stats.running_slow {
        spans.push(Span::styled(
            " SLOW",
            Style::default()
                .fg(CORTEX_AMBER)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

/// Shows [state:ON/OFF]
/// Myelin Green for ON, Glia Grey for OFF
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let (state, color) = if app.session.accepts_state() {
        ("ON", MYELIN_GREEN)
    } else {
        ("OFF", GLIA_GREY)
    };

    vec![
        Span::styled("[state:", Style::default().fg(GLIA_GREY)),
        Span::styled(
            state,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("]", Style::default().fg(GLIA_GREY)),
    ]
}
