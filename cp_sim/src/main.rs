//! Self-play simulator for the cooperative poker engine.
//!
//! Seats a table of bots, plays a series of games through one chain of
//! rematched sessions and prints a JSON summary of the results.

mod bot;
mod config;

use anyhow::Error;
use coop_poker::{GameOption, GameSession, entities::RoundStatus};
use log::{info, warn};
use pico_args::Arguments;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use config::{Overrides, SimConfig};

const HELP: &str = "\
Play cooperative poker games between bots

USAGE:
  cp_sim [OPTIONS]

OPTIONS:
  --games      N           Games to play                 [default: env SIM_GAMES or 100]
  --players    N           Bots at the table             [default: env SIM_PLAYERS or 4]
  --cards      N           Hole cards per player         [default: env SIM_CARDS_PER_PLAYER or 2]
  --seed       N           Seed for a reproducible run   [default: env SIM_SEED or random]
  --options    LIST        Comma-separated game options  [default: env SIM_OPTIONS or none]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter (e.g., info or cp_sim=debug)
  SIM_*                    Defaults for the options above, also read from .env
";

/// Printed once every game has been played.
#[derive(Debug, Serialize)]
struct Summary {
    games: usize,
    players: usize,
    wins: usize,
    losses: usize,
    win_rate: f64,
    score: [u32; 2],
    options: Vec<GameOption>,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        games: pargs.opt_value_from_str("--games")?,
        players: pargs.opt_value_from_str("--players")?,
        seed: pargs.opt_value_from_str("--seed")?,
        options: pargs.opt_value_from_str("--options")?,
        cards_per_player: pargs.opt_value_from_str("--cards")?,
    };
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    env_logger::builder().format_target(false).init();

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;
    info!(
        "Simulating {} game(s) with {} players, {} card(s) each",
        config.games, config.players, config.cards_per_player
    );

    let summary = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(config: &SimConfig) -> Result<Summary, Error> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut session = GameSession::from_settings(config.settings())?;
    if let Some(seed) = config.seed {
        session = session.seeded(seed);
    }
    session.set_options(config.options.iter().copied())?;

    let (mut wins, mut losses) = (0, 0);
    for game in 1..=config.games {
        session.start(config.players)?;
        match bot::play_game(&mut session, &mut rng)? {
            RoundStatus::Win => wins += 1,
            RoundStatus::Lose => losses += 1,
            RoundStatus::InProgress => warn!("Game {game} stopped before scoring"),
        }
        if let Some(position) = session.resolution().and_then(|r| r.first_mismatch) {
            info!("Game {game}: red chips out of order from position {position}");
        }
        if game < config.games {
            session = session.rematch();
        }
    }

    let played = wins + losses;
    let win_rate = if played == 0 {
        0.0
    } else {
        wins as f64 / played as f64
    };
    info!("Won {wins} of {played} game(s)");

    Ok(Summary {
        games: config.games,
        players: config.players,
        wins,
        losses,
        win_rate,
        score: session.score(),
        options: config.options.clone(),
    })
}
