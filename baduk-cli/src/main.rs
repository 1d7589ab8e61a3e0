//! baduk: command-line driver for the rules engine.
//!
//! - `baduk selfplay` plays a uniform-random game to completion
//! - `baduk replay <file>` loads an SGF record and scores the final position

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use baduk_engine::{sgf, Session, DEFAULT_KOMI};

#[derive(Parser)]
#[command(name = "baduk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play random legal moves until both sides pass, then score
    Selfplay {
        /// Board size
        #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u8).range(1..=24))]
        size: u8,
        /// Komi for White
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
        /// RNG seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves even without two passes
        #[arg(long, default_value_t = 1000)]
        max_moves: usize,
        /// Print every move and the board after it
        #[arg(long)]
        verbose: bool,
        /// Write the finished game to this SGF file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load an SGF file, print the final position and the score
    Replay { file: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baduk=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Selfplay {
            size,
            komi,
            seed,
            max_moves,
            verbose,
            out,
        } => selfplay(size, komi, seed, max_moves, verbose, out.as_deref()),
        Commands::Replay { file } => replay(&file),
    }
}

fn selfplay(
    size: u8,
    komi: f64,
    seed: Option<u64>,
    max_moves: usize,
    verbose: bool,
    out: Option<&Path>,
) -> Result<()> {
    if let Some(seed) = seed {
        fastrand::seed(seed);
    }

    let mut session = Session::with_komi(size, komi);
    let mut consecutive_passes = 0;
    while consecutive_passes < 2 && session.history().len() < max_moves {
        let mv = session.random_move();
        let captured = session
            .make_move(mv)
            .context("generated move was rejected")?;
        consecutive_passes = if mv.is_pass() {
            consecutive_passes + 1
        } else {
            0
        };
        tracing::debug!(%mv, captured = captured.len(), "played");
        if verbose {
            println!("{mv}");
            println!("{}\n", session.board());
        }
    }

    print_position(&session);
    if let Some(path) = out {
        fs::write(path, sgf::game_to_sgf(&session))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "game saved");
    }
    Ok(())
}

fn replay(file: &Path) -> Result<()> {
    let data =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let session = sgf::game_from_sgf(&data).context("loading game record")?;
    print_position(&session);
    Ok(())
}

fn print_position(session: &Session) {
    let score = session.score();
    println!("{}", session.board());
    println!("moves: {}", session.history().len());
    println!(
        "black: {}  white: {}  ({})",
        score.black_total(),
        score.white_total(),
        score.result()
    );
}
