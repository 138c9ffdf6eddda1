//! Movie Maths - add and subtract movies from your terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviemaths
//!
//! # Start from an example equation
//! moviemaths --first tt0078748 --second tt0093773
//!
//! # CLI mode (for automation)
//! moviemaths search "alien"
//! moviemaths subtract tt0078748 tt0093773 --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moviemaths::api::{MetadataClient, MovieService};
use moviemaths::app::{App, AppEvent};
use moviemaths::cli::{self, Cli, Command, ExitCode, Output};
use moviemaths::commands;
use moviemaths::config::Config;
use moviemaths::models::{Operator, Slot};
use moviemaths::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        init_logging(LogTarget::Stderr);
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        init_logging(LogTarget::File);
        run_tui(cli, config).await
    }
}

enum LogTarget {
    Stderr,
    File,
}

/// Route tracing output; the TUI owns the terminal so it logs to a file
fn init_logging(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moviemaths=info"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File => {
            let Some(dir) = dirs::cache_dir().map(|d| d.join("moviemaths")) else {
                return;
            };
            let file = std::fs::create_dir_all(&dir)
                .and_then(|_| std::fs::File::create(dir.join("moviemaths.log")));
            if let Ok(file) = file {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
        }
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, &output).await,

        Some(Command::Add(cmd)) => commands::combine_cmd(Operator::Add, cmd, config, &output).await,

        Some(Command::Subtract(cmd)) => {
            commands::combine_cmd(Operator::Subtract, cmd, config, &output).await
        }

        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, config, &output).await,

        Some(Command::Poster(cmd)) => commands::poster_cmd(cmd, config, &output).await,

        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(cli: Cli, config: Config) -> Result<()> {
    let service: Arc<dyn MovieService> = Arc::new(MetadataClient::from_config(&config)?);
    let cache = Arc::new(config.search_cache());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = App::new(Arc::clone(&service), cache, config.debounce(), tx);
    app.set_operator(cli.initial_operator());
    prefill(&mut app, service.as_ref(), &cli).await;

    info!("starting TUI");
    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Seed the equation from `--first` / `--second`
async fn prefill(app: &mut App, service: &dyn MovieService, cli: &Cli) {
    for (slot, id) in [(Slot::First, &cli.first), (Slot::Second, &cli.second)] {
        let Some(id) = id.as_deref() else {
            continue;
        };
        if let Err(e) = cli::validate_imdb_id(id) {
            app.set_error(format!("{}: {}", e, id));
            continue;
        }
        match service.resolve_by_external_id(id).await {
            Ok(Some(movie)) => app.prefill(slot, movie),
            Ok(None) => app.set_error(format!("No movie found for {}", id)),
            Err(e) => app.set_error(format!("Could not load {}: {}", id, e)),
        }
    }
}

/// Main event loop - handles input, applies completions, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(50);

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}
