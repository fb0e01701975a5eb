// Terminal event handling
//
// Keys edit and submit the input line; resize events go to the viewport.

use super::AppState;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Dispatch one terminal event
///
/// Returns `true` if the application should continue running.
pub fn handle_event(app: &mut AppState, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(cols, rows) => {
            app.on_resize(cols, rows);
            true
        }
        _ => app.running,
    }
}

/// Handle a key press
///
/// # Key Bindings
/// - `Esc`, `Ctrl+C` - Quit the application
/// - `Enter` - Send the input line
/// - `Backspace` - Delete the last character
/// - any printable character - Append to the input line
///
/// Unbound Ctrl/Alt chords are ignored rather than typed.
pub fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Enter => {
            app.submit_input();
        }
        KeyCode::Backspace => {
            app.input.backspace();
        }
        KeyCode::Char(_) if chord => {}
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
    app.running
}
