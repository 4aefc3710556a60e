mod app;
mod domain;
mod engine;
mod input;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::Mode;
use engine::{Acceleration, EngineConfig, FocusEngine};
use persistence::{
    data_file, ensure_dir, export_to, get_data_dir, import_file, init_local_data_dir, log_file,
    DocumentStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use report::stats::MAX_REPORT_DAYS;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ticker::Ticker;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (falls back to RUST_LOG)
const LOG_ENV: &str = "FOCUSTRACK_LOG";

#[derive(Parser)]
#[command(name = "focustrack")]
#[command(about = "A terminal Pomodoro timer that tracks where your focus time goes", long_about = None)]
struct Cli {
    /// Run the clock faster than real time (e.g. 60 = one minute per second)
    #[arg(long, global = true, default_value_t = 1.0)]
    accelerate: f64,

    /// Use this data directory instead of discovering one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Timer mode to start the TUI in: 25/5, 50/10 or stopwatch
    #[arg(long, value_parser = parse_mode)]
    mode: Option<Mode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .focustrack directory in the current directory
    Init,
    /// Write all data to a JSON export file
    Export {
        /// Output file or directory. Defaults to the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace data with the contents of an export file
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a markdown summary of recent focus time
    Report {
        /// Number of days to cover, ending today (1-3660)
        #[arg(
            short,
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_REPORT_DAYS))
        )]
        days: u32,
    },
    /// Delete all tasks, history, and streaks
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::parse(s).ok_or_else(|| {
        let labels: Vec<&str> = Mode::all().iter().map(|m| m.label()).collect();
        format!("unknown mode '{}' (use one of: {})", s, labels.join(", "))
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let data_dir = init_local_data_dir()?;
        println!("Initialized focustrack directory: {}", data_dir.display());
        println!();
        println!("focustrack will now use this local directory for its data.");
        println!("Run 'focustrack' to start a session.");
        return Ok(());
    }

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => get_data_dir()?,
    };
    ensure_dir(&data_dir)?;
    init_logging(&data_dir)?;

    let config = EngineConfig {
        acceleration: Acceleration::new(cli.accelerate),
    };
    tracing::info!(
        data_dir = %data_dir.display(),
        acceleration = config.acceleration.factor(),
        "starting"
    );

    match cli.command {
        Some(Commands::Export { output }) => {
            let store = DocumentStore::new(data_file(&data_dir));
            let document = store.load().unwrap_or_default();
            let target = match output {
                Some(path) => path,
                None => std::env::current_dir().context("Could not determine current directory")?,
            };
            let path = export_to(&document, &target, Utc::now())?;
            println!("Exported to {}", path.display());
            Ok(())
        }
        Some(Commands::Import { file, yes }) => run_import(&data_dir, &file, yes, config),
        Some(Commands::Report { days }) => {
            let store = DocumentStore::new(data_file(&data_dir));
            let document = store.load().unwrap_or_default();
            let report = report::generate_report(&document, Local::now().date_naive(), days, &Local);
            print!("{}", report);
            Ok(())
        }
        Some(Commands::Reset { yes }) => run_reset(&data_dir, yes, config),
        Some(Commands::Init) => Ok(()),
        None => run_tui(&data_dir, config, cli.mode),
    }
}

/// Send tracing output to the log file so it never draws over the TUI
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("focustrack=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is no
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn run_import(data_dir: &Path, file: &Path, yes: bool, config: EngineConfig) -> Result<()> {
    let store = DocumentStore::new(data_file(data_dir));
    let current = store.load().unwrap_or_default();

    // Parse before asking so a bad file never reaches the prompt
    let imported = import_file(current.clone(), file)
        .with_context(|| format!("Import rejected: {}", file.display()))?;

    if !yes
        && !confirm(&format!(
            "Replace current data ({} tasks, {} sessions) with {} ({} tasks, {} sessions)?",
            current.tasks.len(),
            current.time_history.len(),
            file.display(),
            imported.tasks.len(),
            imported.time_history.len()
        ))?
    {
        println!("Import cancelled.");
        return Ok(());
    }

    let now = Utc::now();
    let mut engine = FocusEngine::from_document(current, config, now);
    engine.replace_document(imported, now);
    store.save(&engine.to_document(now))?;

    tracing::info!(file = %file.display(), "imported data");
    println!("Imported {}", file.display());
    Ok(())
}

fn run_reset(data_dir: &Path, yes: bool, config: EngineConfig) -> Result<()> {
    if !yes && !confirm("Delete ALL tasks, history, and streaks?")? {
        println!("Reset cancelled.");
        return Ok(());
    }

    let store = DocumentStore::new(data_file(data_dir));
    let now = Utc::now();
    let mut engine = FocusEngine::from_document(store.load().unwrap_or_default(), config, now);
    engine.clear_all_data();
    store.save(&engine.to_document(now))?;

    println!("All data cleared.");
    Ok(())
}

fn run_tui(data_dir: &Path, config: EngineConfig, mode: Option<Mode>) -> Result<()> {
    let mut app = AppState::load(data_dir, config);
    if let Some(mode) = mode {
        app.engine.set_mode(mode)?;
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

    // Fold the run in progress into history before leaving
    app.stop();

    // Save on exit
    if let Err(e) = app.save() {
        tracing::error!(error = %format!("{e:#}"), "failed to save on exit");
        eprintln!("Error saving state: {}", e);
    }

    // Print any errors
    if let Err(err) = result {
        tracing::error!(error = %format!("{err:#}"), "ui loop failed");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut ticker = Ticker::default();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(ticker.timeout())? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        // Tick the engine once per interval
        if ticker.due() {
            app.tick();
        }

        // Autosave if needed
        if app.needs_save {
            app.autosave();
        }
    }
}
