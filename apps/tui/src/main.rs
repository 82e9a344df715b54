//! shellpilot - terminal front end for a remote command runner.

use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use shellpilot_core::{HttpBackend, Session, ShellConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shellpilot_tui::app::App;
use shellpilot_tui::cli::Args;
use shellpilot_tui::views::render_app;

/// Logs go to a file; stderr would draw over the alternate screen.
fn init_logging(config: &ShellConfig) -> Result<()> {
    if std::env::var("RUST_LOG_SHELLPILOT").is_err() {
        return Ok(());
    }

    let log_dir = config.history.storage_root()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let log_path = log_dir.join("shellpilot.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG_SHELLPILOT")
                .unwrap_or_else(|_| "shellpilot_core=info,shellpilot_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;
    init_logging(&config)?;

    let session = Session::open(&config, &args.history_scope())?;
    let backend = HttpBackend::from_config(&config.backend)?;
    info!(url = %backend.base_url(), session = %args.session, "Starting shellpilot");

    let mut app = App::new(
        session,
        Arc::new(backend),
        &args.session,
        &config.backend.url,
        config.ui.default_mode,
    );
    app.request_health();
    let periodic = config.health.interval().map(|period| app.spawn_periodic_health(period));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = run(&mut app);

    // Restore terminal
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    if let Some(handle) = periodic {
        handle.abort();
    }
    result
}

fn run(app: &mut App) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    while !app.should_quit {
        app.process_events();
        terminal.draw(|frame| render_app(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        } else {
            app.on_tick();
        }
    }

    Ok(())
}
