//! Whole-game invariants under random play
//!
//! Random controllers wander through every board; after each decision the
//! total number of each card across all zones must not change.

use wickinion::core::BOARD_SETUPS;
use wickinion::game::{
    GameConfig, GameLogger, GameLoop, GameState, PlayerController, RandomController, StepOutcome, VerbosityLevel,
};

const MAX_TURNS: u32 = 30;

fn silent_game(players: usize, board: &str, seed: u64) -> GameState {
    let config = GameConfig::new(players).preset(board).seed(seed);
    GameState::with_logger(&config, GameLogger::with_verbosity(VerbosityLevel::Silent)).unwrap()
}

fn random_seats(players: usize, seed: u64) -> Vec<Box<dyn PlayerController>> {
    (0..players)
        .map(|seat| Box::new(RandomController::new(seat, seed + seat as u64)) as Box<dyn PlayerController>)
        .collect()
}

#[test]
fn test_card_totals_never_change() {
    for (i, board) in BOARD_SETUPS.iter().enumerate() {
        let players = 2 + i % 3;
        let seed = 100 + i as u64;
        let mut game = silent_game(players, board.id, seed);
        let initial = game.card_census();
        let mut controllers = random_seats(players, seed);

        let mut game_loop = GameLoop::new(&mut game).with_max_turns(MAX_TURNS);
        loop {
            let outcome = game_loop.step(&mut controllers).unwrap();
            assert_eq!(
                game_loop.game.card_census(),
                initial,
                "card totals changed on board {}",
                board.id
            );
            if let StepOutcome::Finished(_) = outcome {
                break;
            }
        }
    }
}

#[test]
fn test_turn_counters_stay_sane() {
    let mut game = silent_game(4, "chaos_reactions", 77);
    let mut controllers = random_seats(4, 77);
    let mut game_loop = GameLoop::new(&mut game).with_max_turns(MAX_TURNS);

    let mut last_turn = 1;
    loop {
        let outcome = game_loop.step(&mut controllers).unwrap();
        let game = &*game_loop.game;
        assert!(game.turn_count >= last_turn);
        last_turn = game.turn_count;
        assert!(game.current_player < game.players.len());
        assert!(game.action_multiplier == 1 || game.action_multiplier == 2);
        if let Some(head) = game.current_interaction() {
            assert!(head.target_player < game.players.len());
            assert!(head.max.map_or(true, |max| head.min <= max));
        }
        if let StepOutcome::Finished(_) = outcome {
            break;
        }
    }
}

#[test]
fn test_same_seed_same_transcript() {
    let play = |seed: u64| {
        let mut game = silent_game(3, "the_engine", seed);
        let mut controllers = random_seats(3, seed);
        GameLoop::new(&mut game)
            .with_max_turns(MAX_TURNS)
            .run_game(&mut controllers)
            .unwrap();
        game.log
    };
    similar_asserts::assert_eq!(play(9), play(9));
}
