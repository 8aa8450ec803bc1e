//! ClientDesk TUI - terminal form builder for the ClientDesk backend
//!
//! A Ratatui-based TUI where admins design client intake forms and
//! clients browse the forms published for them.

mod api;
mod app;
mod auth;
mod config;
mod controller;
mod logging;
mod state;
mod ui;
mod utils;

use anyhow::Result;
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = TuiConfig::load()?;

    // Initialize logging; the guard flushes the log file on exit
    let log_path = TuiConfig::log_path();
    let log_guard = match logging::init(config.log_level(), &log_path) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Logging disabled: {err:#}");
            None
        }
    };
    for warning in config.take_warnings() {
        if log_guard.is_some() {
            tracing::warn!("{warning}");
        } else {
            eprintln!("Warning: {warning}");
        }
    }
    tracing::info!(api = config.api_base_url(), "starting");

    let mut app = App::new(config).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
        eprintln!("Error: {err:?}");
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    app.on_resize(terminal.size()?.width);

    loop {
        app.tick();

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Network calls run after the frame that shows their busy state
        if app.has_deferred_work() {
            app.run_deferred_work().await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Global quit: Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    app.handle_key(key).await?;
                }
                Event::Resize(width, _height) => app.on_resize(width),
                _ => {}
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
