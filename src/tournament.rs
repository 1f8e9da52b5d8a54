//! Simulation mode: play many bot games in parallel and collect statistics
//!
//! Games are independent, so each runs on its own rayon worker with a seed
//! derived from the master seed and the game index.

use crate::game::{
    BoardChoice, GameConfig, GameLogger, GameLoop, GameResult, GameState, HeuristicController, PlayerController,
    RandomController, VerbosityLevel,
};
use crate::{GameError, Result};
use clap::ValueEnum;
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

/// Bot type for a simulated seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BotKind {
    Random,
    Heuristic,
}

impl BotKind {
    pub fn build(self, seat: usize, seed: u64) -> Box<dyn PlayerController> {
        match self {
            BotKind::Random => Box::new(RandomController::new(seat, seed)),
            BotKind::Heuristic => Box::new(HeuristicController::new(seat)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub games: usize,
    /// One entry per seat
    pub bots: Vec<BotKind>,
    pub board: BoardChoice,
    pub seed: u64,
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            games: 100,
            bots: vec![BotKind::Heuristic, BotKind::Heuristic],
            board: BoardChoice::default(),
            seed: 42,
            max_turns: 100,
        }
    }
}

impl SimConfig {
    /// Seed for one game; spreads consecutive indices across the seed space
    pub fn game_seed(&self, game_idx: usize) -> u64 {
        self.seed.wrapping_add((game_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Aggregated results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimSummary {
    pub games_played: usize,
    pub failed: usize,
    /// Wins by seat; a shared top score counts for every tied seat
    pub wins: Vec<usize>,
    /// Games won by more than one seat
    pub ties: usize,
    /// Games cut off by the turn limit
    pub turn_limited: usize,
    pub average_turns: f64,
    pub average_winning_score: f64,
    pub elapsed: Duration,
}

/// Play one seeded game to completion
pub fn play_one(config: &SimConfig, game_idx: usize) -> Result<GameResult> {
    let seed = config.game_seed(game_idx);
    let game_config = GameConfig::new(config.bots.len()).board(config.board.clone()).seed(seed);
    let mut game = GameState::with_logger(&game_config, GameLogger::with_verbosity(VerbosityLevel::Silent))?;

    let mut controllers: Vec<Box<dyn PlayerController>> = config
        .bots
        .iter()
        .enumerate()
        .map(|(seat, bot)| bot.build(seat, seed.wrapping_add(seat as u64 + 1)))
        .collect();

    GameLoop::new(&mut game)
        .with_max_turns(config.max_turns)
        .run_game(&mut controllers)
}

pub fn run_simulation(config: &SimConfig) -> Result<SimSummary> {
    if config.games == 0 {
        return Err(GameError::InvalidConfig("at least one game is required".to_string()));
    }
    let start = Instant::now();

    let results: Vec<Result<GameResult>> = (0..config.games)
        .into_par_iter()
        .map(|game_idx| play_one(config, game_idx))
        .collect();

    let mut summary = SimSummary {
        wins: vec![0; config.bots.len()],
        ..SimSummary::default()
    };
    let mut total_turns = 0u64;
    let mut total_winning = 0i64;

    for result in results {
        let result = match result {
            Ok(result) => result,
            Err(GameError::InvalidConfig(msg)) => return Err(GameError::InvalidConfig(msg)),
            Err(_) => {
                summary.failed += 1;
                continue;
            }
        };
        summary.games_played += 1;
        total_turns += u64::from(result.turns);
        for &seat in &result.winners {
            summary.wins[seat] += 1;
        }
        if result.winners.len() > 1 {
            summary.ties += 1;
        }
        if result.end_reason == crate::game::GameEndReason::TurnLimit {
            summary.turn_limited += 1;
        }
        if let Some(best) = result.scores.iter().max() {
            total_winning += i64::from(*best);
        }
    }

    if summary.games_played > 0 {
        let n = summary.games_played as f64;
        summary.average_turns = total_turns as f64 / n;
        summary.average_winning_score = total_winning as f64 / n;
    }
    summary.elapsed = start.elapsed();
    Ok(summary)
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Complete ===")?;
        writeln!(f, "Games played: {} ({} failed)", self.games_played, self.failed)?;
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            writeln!(f, "Games per second: {:.2}", self.games_played as f64 / secs)?;
        }
        writeln!(f)?;
        for (seat, wins) in self.wins.iter().enumerate() {
            let pct = if self.games_played > 0 {
                100.0 * *wins as f64 / self.games_played as f64
            } else {
                0.0
            };
            writeln!(f, "Seat {} wins: {} ({:.1}%)", seat + 1, wins, pct)?;
        }
        writeln!(f, "Ties: {}", self.ties)?;
        writeln!(f, "Stopped at turn limit: {}", self.turn_limited)?;
        writeln!(f, "Average turns: {:.1}", self.average_turns)?;
        write!(f, "Average winning score: {:.1}", self.average_winning_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_counts_every_game() {
        let config = SimConfig {
            games: 6,
            max_turns: 60,
            ..SimConfig::default()
        };
        let summary = run_simulation(&config).unwrap();
        assert_eq!(summary.games_played + summary.failed, 6);
        assert_eq!(summary.failed, 0);
        assert!(summary.wins.iter().sum::<usize>() >= summary.games_played);
        assert!(summary.average_turns >= 1.0);
    }

    #[test]
    fn test_seeded_games_repeat() {
        let config = SimConfig {
            bots: vec![BotKind::Random, BotKind::Heuristic, BotKind::Random],
            max_turns: 40,
            ..SimConfig::default()
        };
        assert_eq!(play_one(&config, 3).unwrap(), play_one(&config, 3).unwrap());
    }

    #[test]
    fn test_bad_seat_count_is_config_error() {
        let config = SimConfig {
            games: 2,
            bots: vec![BotKind::Random],
            ..SimConfig::default()
        };
        assert!(matches!(run_simulation(&config), Err(GameError::InvalidConfig(_))));
    }
}
