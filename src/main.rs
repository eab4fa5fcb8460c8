use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mcts_connect_four::config::{AppConfig, FirstTurn};
use mcts_connect_four::ui::App;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

/// Play Connect Four against a Monte Carlo Tree Search opponent.
#[derive(Parser)]
#[command(name = "mcts-connect-four", about = "Play Connect Four against an MCTS AI")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override MCTS iterations per AI move
    #[arg(long)]
    iterations: Option<u32>,

    /// Who opens each game: player, ai or random
    #[arg(long)]
    first: Option<FirstTurn>,

    /// Seed for the AI's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_file_logging(path: &Path) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();

    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(iterations) = cli.iterations {
        config.ai.iterations = iterations;
    }
    if let Some(first) = cli.first {
        config.game.first_turn = first;
    }
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    config.validate()?;

    info!(
        iterations = config.ai.iterations,
        first_turn = ?config.game.first_turn,
        seed = ?config.game.seed,
        "starting game"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let res = app.run(&mut terminal);

    // Restore terminal, even if the game loop failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running terminal UI")
}
