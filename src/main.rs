//! High-Low Trading Gym - demo binary
//!
//! Plays one full game of high-low trading against itself: chance nodes are
//! sampled from their uniform distributions, players pick uniformly random
//! legal quotes. Prints each move, the final omniscient state, and the
//! terminal returns.

mod config;

use game::{GameState, load_game};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use types::{ActionId, Actor};

pub use config::DemoConfig;

/// Sample one chance outcome according to its probability weight.
fn sample_chance(state: &GameState, rng: &mut StdRng) -> Result<ActionId, game::GameError> {
    let outcomes = state.chance_outcomes()?;
    let mut roll: f64 = rng.gen();
    for (action, probability) in &outcomes {
        roll -= probability;
        if roll <= 0.0 {
            return Ok(*action);
        }
    }
    // Guard against accumulated rounding at the tail of the distribution.
    Ok(outcomes[outcomes.len() - 1].0)
}

fn run(config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let game = load_game("high_low_trading", &config.game_params())?;
    let mut state = game.new_initial_state();
    let mut rng = StdRng::seed_from_u64(config.seed);
    info!(seed = config.seed, players = game.num_players(), "self-play demo");

    println!(
        "high_low_trading: {} players, {} steps each, {} moves total",
        game.num_players(),
        game.config().steps_per_player,
        game.max_game_length()
    );

    while !state.is_terminal() {
        let actor = state.current_player();
        let action = match actor {
            Actor::Chance => sample_chance(&state, &mut rng)?,
            Actor::Player(_) => {
                let legal = state.legal_actions();
                legal[rng.gen_range(0..legal.len())]
            }
            Actor::Terminal => break,
        };
        println!("{}", state.action_to_string(actor, action)?);
        state.apply_action(action)?;
    }

    println!();
    println!("{}", state);

    println!("********** Returns **********");
    for (seat, value) in state.returns()?.iter().enumerate() {
        println!("Player P{} utility: {}", seat, value);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(DemoConfig::default()) {
        eprintln!("demo failed: {}", err);
        std::process::exit(1);
    }
}
