//! TUI entrypoint: steps an SN P system and renders its spike raster
//! Controls: [s] Step, [b] Back, [x] Reset, [r] Run/Pause, [q] Quit

mod app;
mod backend;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute, terminal,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use backend::{CoreBackend, DemoSystem, Selection, SnpBackend};
use ui::draw;

#[derive(Parser, Debug)]
#[command(name = "snp-tui", about = "Step an SN P system forward and backward")]
struct Args {
    /// Milliseconds between steps while running
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
    /// Raster width in columns
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Built-in system to load
    #[arg(long, value_enum, default_value_t = DemoSystem::Figure)]
    system: DemoSystem,
    /// How each neuron picks among its applicable rules
    #[arg(long, value_enum, default_value_t = Selection::First)]
    selection: Selection,
    /// Seed for random selection (drawn at start-up and logged when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs here (the terminal is taken by the UI); filter with RUST_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    // Build the system before touching the terminal so errors print normally.
    let model = args.system.build()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let backend = CoreBackend::with_selection(model, args.selection, seed).context("assembling system")?;
    info!(
        system = ?args.system,
        selection = ?args.selection,
        seed,
        neurons = backend.neurons(),
        "starting"
    );

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // Ensure terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    let mut app = App::new(backend, args.width);
    let tick_rate = Duration::from_millis(args.tick_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        draw(&mut terminal, &app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('s') => app.step(),
                    KeyCode::Char('b') => app.step_back(),
                    KeyCode::Char('x') => app.reset(),
                    KeyCode::Char('r') => app.toggle_running(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if app.running {
                app.step();
            }
            last_tick = Instant::now();
        }
    }

    restore_terminal()?;
    info!(time = app.backend.time(), "quit");
    Ok(())
}
