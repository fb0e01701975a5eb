// Theme module - Color palette and mapping helpers
//
// Panel colors reuse the region hues so the chrome matches the cortex view.

use ratatui::style::Color;

use crate::scene::Rgb;
use crate::stream::{EventKind, SessionStatus};

/// Primary accent - borders, titles (decoder violet)
/// RGB: (139, 92, 246)
pub const SYNAPSE_VIOLET: Color = Color::Rgb(139, 92, 246);

/// Secondary accent - thoughts, journal frame (encoder blue)
/// RGB: (59, 130, 246)
pub const AXON_BLUE: Color = Color::Rgb(59, 130, 246);

/// Healthy/connected indicator (memory green)
/// RGB: (16, 185, 129)
pub const MYELIN_GREEN: Color = Color::Rgb(16, 185, 129);

/// Warnings, chat (cognitive amber)
/// RGB: (245, 158, 11)
pub const CORTEX_AMBER: Color = Color::Rgb(245, 158, 11);

/// Errors, disconnected state
/// RGB: (239, 68, 68)
pub const SPIKE_RED: Color = Color::Rgb(239, 68, 68);

/// Neutral text
/// RGB: (203, 213, 225)
pub const GLIA_GREY: Color = Color::Rgb(203, 213, 225);

/// Convert a scene color to a terminal color, clamping out-of-range channels
pub fn rgb_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_rgb8();
    Color::Rgb(r, g, b)
}

/// Color for the session status indicator
pub fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Idle => GLIA_GREY,
        SessionStatus::Connected => MYELIN_GREEN,
        SessionStatus::Disconnected => SPIKE_RED,
    }
}

/// Color of a journal line by event origin
pub fn event_color(kind: EventKind) -> Color {
    match kind {
        EventKind::Log => GLIA_GREY,
        EventKind::Thought => AXON_BLUE,
        EventKind::Chat => CORTEX_AMBER,
        EventKind::User => MYELIN_GREEN,
    }
}
