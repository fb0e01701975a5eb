// brainscope - Live neural telemetry viewer
// Streams brain-region activity over a WebSocket and renders it as a
// rotating field of neuron proxies in the terminal.

mod app;
mod logging;
mod scene;
mod stream;
mod theme;
mod ui;

use anyhow::Result;
use app::{event::handle_event, AppState, Cli};
use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path)?;
    }
    tracing::info!(host = %cli.host, port = cli.port, fps = cli.fps, "Starting brainscope");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &cli);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "brainscope exited with an error");
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, cli: &Cli) -> Result<()> {
    let size = terminal.size()?;
    let mut app = AppState::new(
        cli.session_config(),
        cli.frame_config(),
        size.width,
        size.height,
    );
    app.start();

    let result = event_loop(terminal, &mut app);
    app.teardown();
    result
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        app.on_tick();
        app.render_tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(app.frame_config.frame_interval())? {
            handle_event(app, event::read()?);
        }
    }
}
