use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use mcts_connect_four::game::{Board, Piece, TurnRule, COLS};
use mcts_connect_four::mcts::{search_with_rng, SearchResult, DEFAULT_ITERATIONS};

/// Run one MCTS search on a board and report the chosen column.
#[derive(Parser)]
#[command(name = "analyze", about = "Analyze a Connect Four position with MCTS")]
struct Cli {
    /// Board file, six lines top row first ('.', 'P', 'A'). Reads stdin if omitted.
    #[arg(long)]
    board: Option<PathBuf>,

    /// MCTS iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Piece to move when the piece count is even: player or ai
    #[arg(long, default_value = "ai", value_parser = parse_piece)]
    even_mover: Piece,

    /// Seed for the search's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Print the search result as JSON
    #[arg(long)]
    json: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_piece(s: &str) -> Result<Piece, String> {
    match s.to_ascii_lowercase().as_str() {
        "player" => Ok(Piece::Player),
        "ai" => Ok(Piece::Ai),
        other => Err(format!("unknown piece '{other}' (expected 'player' or 'ai')")),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_board(path: Option<&PathBuf>) -> Result<Board> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading board from stdin")?;
            buf
        }
    };
    text.parse::<Board>().context("parsing board")
}

fn print_report(board: &Board, turn: TurnRule, result: &SearchResult) {
    print!("{board}");
    println!("1234567");
    println!();
    println!(
        "{} to move, {} iterations, {} tree nodes",
        turn.piece_to_move(board).name(),
        result.iterations,
        result.tree_nodes
    );
    println!("Chosen column: {}", result.column + 1);
    println!();
    println!("col  visits   ratio  win rate");
    for col in 0..COLS {
        match result.statistics.get(col) {
            Some(stats) => println!(
                "{:>3}  {:>6}  {:>6.3}  {:>8.3}",
                col + 1,
                stats.visits,
                stats.visit_ratio,
                stats.win_rate
            ),
            None => println!("{:>3}  {:>6}", col + 1, "-"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let board = read_board(cli.board.as_ref())?;
    let turn = TurnRule::new(cli.even_mover);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        pieces = board.piece_count(),
        iterations = cli.iterations,
        "analyzing position"
    );
    let result = search_with_rng(&board, cli.iterations, turn, &mut rng)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("serializing search result")?;
        println!("{json}");
    } else {
        print_report(&board, turn, &result);
    }

    Ok(())
}
