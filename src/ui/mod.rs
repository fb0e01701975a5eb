// UI rendering module
//
// This module contains all UI rendering components for brainscope.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod cortex;
mod input;
mod journal;
mod status_bar;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use banner::render_banner;
use cortex::render_cortex;
use input::render_input;
use journal::render_journal;
use status_bar::render_status_bar;

/// Braille dots per terminal cell
const DOTS_PER_CELL_X: u32 = 2;
const DOTS_PER_CELL_Y: u32 = 4;

/// Screen regions of the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLayout {
    pub banner: Rect,
    pub cortex: Rect,
    pub journal: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Split the terminal area into panels
pub fn view_layout(area: Rect) -> ViewLayout {
    // Main layout: banner, body, input line, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Input
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    // Body: cortex canvas + journal
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(65), // Cortex
            Constraint::Percentage(35), // Journal
        ])
        .split(chunks[1]);

    ViewLayout {
        banner: chunks[0],
        cortex: body[0],
        journal: body[1],
        input: chunks[2],
        status: chunks[3],
    }
}

/// Draw surface size in Braille dots for a terminal of `cols` x `rows`
///
/// Covers the cortex panel inside its border.
pub fn cortex_surface_size(cols: u16, rows: u16) -> (u32, u32) {
    let cortex = view_layout(Rect::new(0, 0, cols, rows)).cortex;
    let inner_cols = cortex.width.saturating_sub(2) as u32;
    let inner_rows = cortex.height.saturating_sub(2) as u32;
    (inner_cols * DOTS_PER_CELL_X, inner_rows * DOTS_PER_CELL_Y)
}

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &AppState) {
    let layout = view_layout(f.area());

    render_banner(f, layout.banner, app);
    render_cortex(f, layout.cortex, app);
    render_journal(f, layout.journal, app);
    render_input(f, layout.input, app);
    render_status_bar(f, layout.status, app);
}
