use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod engine;
mod error;
mod exponentile;
mod tui;

use engine::board::DEFAULT_SIZE;
use engine::game::Game;
use engine::rng::GameRng;
use engine::snapshot::{parse_values, Snapshot};
use exponentile::Exponentile;
use tui::crossterm::{Crossterm, CrosstermEvents};

/// Smallest board on which a swap can ever line up three tiles.
const MIN_PLAYABLE_SIZE: usize = 3;

/// Swap neighbouring tiles to line up three or more of the same number; matching tiles merge
/// into one bigger number.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Width and height of the board.
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Seed for the random source, making the game reproducible.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a saved board: either comma-separated exponents in row-major order or a
    /// full `size:score:moves:values[:seed:draws]` snapshot, which also restores the random
    /// source.
    #[arg(long)]
    board: Option<String>,

    /// Milliseconds between the animation steps of a move.
    #[arg(long, default_value_t = 150)]
    delay: u64,

    #[arg(long, default_value = "./exponentile.log")]
    log_file: PathBuf,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let args = Args::parse();

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(args.verbose.log_level_filter())
        .chain(fern::log_file(&args.log_file)?)
        .apply()?;

    let game = start_game(&args)?;
    log::info!(
        "starting a {0}x{0} game, seed {1}",
        game.size(),
        game.snapshot().rng.map_or(0, |state| state.seed)
    );

    let renderer = Crossterm::new(Box::new(stdout().lock()))?;
    let event_source = CrosstermEvents::default();
    let app = Exponentile::new(
        game,
        renderer,
        event_source,
        Duration::from_millis(args.delay),
    );
    let snapshot = app.run()?;

    log::info!("final state {}", snapshot);
    println!("score {} after {} moves", snapshot.score, snapshot.moves);
    println!("resume with: --board {}", snapshot);
    Ok(())
}

fn start_game(args: &Args) -> error::Result<Game> {
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let Some(board) = &args.board else {
        check_playable(args.size)?;
        return Game::new(rng, args.size);
    };
    let snapshot = if board.contains(':') {
        board.parse::<Snapshot>()?
    } else {
        Snapshot::from_values(parse_values(board)?)?
    };
    check_playable(snapshot.size)?;
    if snapshot.rng.is_some() && args.seed.is_some() {
        log::warn!("--seed is ignored, the saved game carries its own");
    }
    Game::restore(rng, &snapshot)
}

fn check_playable(size: usize) -> error::Result<()> {
    if size < MIN_PLAYABLE_SIZE {
        return Err(error::Error::InvalidSize(size));
    }
    Ok(())
}
