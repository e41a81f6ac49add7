mod app;
mod cli;
mod clock;
mod config;
mod domain;
mod engine;
mod input;
mod notifications;
mod persistence;
mod ui;

use anyhow::Result;
use app::AppState;
use clap::Parser;
use cli::{Cli, Commands};
use clock::{Clock, SystemClock};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{data_file, ensure_dir, get_data_dir, init_local_dir, JsonFileStore, StoreWatcher, LOG_FILE};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FROGDAY_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// CLI subcommands log to stderr
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// The terminal belongs to the TUI, so logs go to a file in the data directory
fn init_file_logging(dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn main() -> Result<()> {
    let Cli { data_dir, command } = Cli::parse();

    match command {
        Some(Commands::Init) => {
            // Initialize local .frogday directory
            let cwd = std::env::current_dir()?;
            let dir = init_local_dir(&cwd)?;
            println!("Initialized data directory: {}", dir.display());
            println!();
            println!("frog will now use this local directory for its data.");
            println!("Run 'frog' to start planning.");
            Ok(())
        }
        Some(command) => run_command(data_dir, command),
        None => run_tui(data_dir),
    }
}

fn run_command(data_dir: Option<PathBuf>, command: Commands) -> Result<()> {
    init_stderr_logging();

    let dir = get_data_dir(data_dir.as_deref())?;
    ensure_dir(&dir)?;
    let config = Config::load(&dir)?;
    let store = JsonFileStore::new(dir.clone(), config.backup_retention);

    let output = cli::run(command, &store, &SystemClock, &config)?;
    println!("{}", output);
    Ok(())
}

fn run_tui(data_dir: Option<PathBuf>) -> Result<()> {
    let dir = get_data_dir(data_dir.as_deref())?;
    ensure_dir(&dir)?;
    let _log_guard = init_file_logging(&dir);

    // Show which file we're using
    eprintln!("Using data file: {}", data_file(&dir).display());
    tracing::info!(dir = %dir.display(), "starting");

    let config = Config::load(&dir)?;
    let store = JsonFileStore::new(dir.clone(), config.backup_retention);
    match store.create_daily_backup(SystemClock.today()) {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "daily backup written"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "daily backup failed"),
    }

    let mut app = AppState::new(Box::new(store), Rc::new(SystemClock), config)?;
    match StoreWatcher::start(&dir) {
        Ok(watcher) => app = app.with_watcher(watcher),
        Err(e) => tracing::warn!(error = %e, "file watcher unavailable; external edits need a restart"),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = &result {
        tracing::error!(error = %err, "exited with error");
    }
    tracing::info!("stopped");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = app.config.tick_rate();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        // Reloads, midnight roll-over and timer polling
        app.tick();
    }
}
