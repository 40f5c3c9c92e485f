//! Integration tests driving full games through the public API.
//!
//! Random seeded playthroughs across several configurations verify that the
//! state machine always reaches terminal, keeps the books conservative, and
//! honors the host-framework metadata along the way.

use game::{GameState, load_game};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use types::{Actor, GameParameters, PlayerId};

fn params(players: i64, steps: i64, contracts: i64, target: i64, value: i64) -> GameParameters {
    let mut params = GameParameters::new();
    params.insert("players".into(), players);
    params.insert("steps_per_player".into(), steps);
    params.insert("max_contracts_per_trade".into(), contracts);
    params.insert("customer_max_size".into(), target);
    params.insert("max_contract_value".into(), value);
    params
}

fn play_random_game(state: &mut GameState, rng: &mut StdRng) {
    while !state.is_terminal() {
        let action = match state.current_player() {
            Actor::Chance => {
                let outcomes = state.chance_outcomes().unwrap();
                outcomes[rng.gen_range(0..outcomes.len())].0
            }
            Actor::Player(_) => {
                let legal = state.legal_actions();
                legal[rng.gen_range(0..legal.len())]
            }
            Actor::Terminal => unreachable!("loop guard"),
        };
        state.apply_action(action).unwrap();
    }
}

#[test]
fn random_games_reach_terminal_and_conserve_positions() {
    for (seed, players) in [(1u64, 4i64), (2, 5), (3, 7), (4, 10)] {
        let game = load_game("high_low_trading", &params(players, 2, 3, 2, 10)).unwrap();
        let mut state = game.new_initial_state();
        let mut rng = StdRng::seed_from_u64(seed);

        play_random_game(&mut state, &mut rng);

        assert!(state.is_terminal());
        assert_eq!(state.move_number(), game.max_game_length());
        assert_eq!(state.current_player(), Actor::Terminal);
        assert!(state.legal_actions().is_empty());

        let contracts: i64 = state.positions().iter().map(|p| p.contracts).sum();
        let cash: i64 = state.positions().iter().map(|p| p.cash.raw()).sum();
        assert_eq!(contracts, 0, "seed {}", seed);
        assert_eq!(cash, 0, "seed {}", seed);

        let returns = state.returns().unwrap();
        assert_eq!(returns.len(), game.num_players());
    }
}

#[test]
fn every_fill_pairs_an_earlier_resting_order() {
    let game = load_game("high_low_trading", &params(5, 3, 2, 2, 8)).unwrap();
    let mut total_fills = 0;

    for seed in 10..15 {
        let mut state = game.new_initial_state();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_game(&mut state, &mut rng);

        for fill in state.fills() {
            // The resting side of every fill is the earlier order.
            assert!(fill.resting_order_id < fill.aggressor_order_id);
            assert!(fill.quantity.raw() >= 1);
            assert!(fill.quantity <= fill.resting_quantity);
        }
        total_fills += state.fills().len();
    }
    assert!(total_fills > 0, "dense random games should trade");
}

#[test]
fn tensors_keep_their_shape_throughout_a_game() {
    let game = load_game("high_low_trading", &params(4, 2, 2, 3, 6)).unwrap();
    let mut state = game.new_initial_state();
    let mut rng = StdRng::seed_from_u64(5);
    let expected_len = game.information_state_tensor_shape()[0];

    while !state.is_terminal() {
        for seat in 0..game.num_players() {
            let tensor = state.information_state_tensor(PlayerId(seat)).unwrap();
            assert_eq!(tensor.len(), expected_len);
            assert_eq!(tensor, state.observation_tensor(PlayerId(seat)).unwrap());
        }
        let action = match state.current_player() {
            Actor::Chance => {
                let outcomes = state.chance_outcomes().unwrap();
                outcomes[rng.gen_range(0..outcomes.len())].0
            }
            _ => {
                let legal = state.legal_actions();
                legal[rng.gen_range(0..legal.len())]
            }
        };
        state.apply_action(action).unwrap();
    }
}

#[test]
fn undo_after_random_play_restores_the_transcript() {
    let game = load_game("high_low_trading", &params(4, 1, 2, 2, 6)).unwrap();
    let mut state = game.new_initial_state();
    let mut rng = StdRng::seed_from_u64(9);

    play_random_game(&mut state, &mut rng);
    let full_history = state.history().to_vec();

    state.undo_last_action().unwrap();
    assert_eq!(state.history(), &full_history[..full_history.len() - 1]);
    assert!(!state.is_terminal());

    state.apply_action(full_history[full_history.len() - 1]).unwrap();
    assert!(state.is_terminal());
    for seat in 0..game.num_players() {
        let player = PlayerId(seat);
        assert_eq!(
            state.information_state_string(player).unwrap(),
            {
                // Replaying the same transcript from scratch gives the same view.
                let mut replay = game.new_initial_state();
                for &action in &full_history {
                    replay.apply_action(action).unwrap();
                }
                replay.information_state_string(player).unwrap()
            }
        );
    }
}
