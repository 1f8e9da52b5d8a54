//! Game loop implementation
//!
//! Drives a local (pass-and-play or bot) game: asks whichever seat the game
//! is waiting on for a decision, applies it, and repeats until the supply
//! ends the game or the loop's own limits stop it.

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating the format! allocations on every decision.
macro_rules! log_choice {
    ($game:expr, $name:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $game.logger.controller_choice($name, &format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = (&$game, &$name);
        }
    };
}

use crate::game::controller::{minimal_selection, GameStateView, PlayerController};
use crate::game::supply::GameEndReason;
use crate::game::{GameState, TurnAction};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - transcript and refusals (default)
    #[default]
    Normal = 2,
    /// Verbose - every controller decision and network event
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Scores by seat
    pub scores: Vec<i32>,
    /// Every seat sharing the top score
    pub winners: Vec<usize>,
    /// Value of the turn counter when play stopped
    pub turns: u32,
    pub end_reason: GameEndReason,
}

/// Outcome of a single decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Finished(GameEndReason),
}

/// Game loop manager
pub struct GameLoop<'a> {
    pub game: &'a mut GameState,
    /// Turn counter value past which the game is abandoned
    max_turns: u32,
    /// Refused decisions in a row before the loop answers for the seat
    max_rejections: u32,
    rejections: u32,
    /// Decisions made by all controllers so far
    choice_counter: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            max_turns: 200,
            max_rejections: 3,
            rejections: 0,
            choice_counter: 0,
        }
    }

    /// Set maximum turns before giving up on the game
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_rejections(mut self, max_rejections: u32) -> Self {
        self.max_rejections = max_rejections.max(1);
        self
    }

    pub fn choice_count(&self) -> u32 {
        self.choice_counter
    }

    /// Run until the game ends
    ///
    /// `controllers` must cover every seat; order does not matter.
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        let reason = loop {
            if let StepOutcome::Finished(reason) = self.step(controllers)? {
                break reason;
            }
        };

        let result = GameResult {
            scores: self.game.final_scores(),
            winners: self.game.winners(),
            turns: self.game.turn_count,
            end_reason: reason,
        };
        self.game.logger.minimal(&format!(
            "Game finished after {} turns ({}). Scores: {:?}",
            result.turns, reason, result.scores
        ));

        let view = GameStateView::from_state(self.game);
        for controller in controllers.iter_mut() {
            let won = result.winners.contains(&controller.player_index());
            controller.on_game_end(&view, won);
        }
        Ok(result)
    }

    /// Ask the waiting seat for one decision and apply it
    pub fn step(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<StepOutcome> {
        if self.game.game_over {
            let reason = self.game.end_reason.unwrap_or(GameEndReason::Stalled);
            return Ok(StepOutcome::Finished(reason));
        }
        if self.game.turn_count > self.max_turns {
            return Ok(StepOutcome::Finished(GameEndReason::TurnLimit));
        }

        let seat = self.game.active_player();
        let controller = controllers
            .iter_mut()
            .find(|c| c.player_index() == seat)
            .ok_or_else(|| GameError::InvalidConfig(format!("no controller for seat {}", seat)))?;
        self.choice_counter += 1;

        let forced = self.rejections >= self.max_rejections;
        let outcome = match self.game.current_interaction().cloned() {
            Some(interaction) => {
                let selection = {
                    let view = GameStateView::from_state(self.game);
                    if forced {
                        minimal_selection(&view, &interaction)
                    } else {
                        controller.choose_selection(&view, &interaction)
                    }
                };
                log_choice!(self.game, controller.name(), "{} for {}", selection, interaction.source);
                self.game.resolve_interaction(seat, selection)
            }
            None => {
                let action = if forced {
                    TurnAction::EndTurn
                } else {
                    let view = GameStateView::from_state(self.game);
                    let available = view.legal_actions();
                    controller.choose_action(&view, &available)
                };
                log_choice!(self.game, controller.name(), "{}", action);
                self.game.apply(seat, &action)
            }
        };

        match outcome {
            Ok(()) => {
                self.rejections = 0;
                Ok(StepOutcome::Continue)
            }
            Err(GameError::IllegalAction(_) | GameError::InvalidSelection(_)) if !forced => {
                self.rejections += 1;
                Ok(StepOutcome::Continue)
            }
            Err(GameError::IllegalAction(_) | GameError::InvalidSelection(_)) => {
                Ok(StepOutcome::Finished(GameEndReason::Stalled))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::game::{FixedScriptController, GameConfig, HeuristicController, RandomController};

    #[test]
    fn test_heuristic_game_finishes() {
        let mut game = GameState::new(&GameConfig::new(2).seed(17)).unwrap();
        let mut controllers: Vec<Box<dyn PlayerController>> =
            vec![Box::new(HeuristicController::new(0)), Box::new(HeuristicController::new(1))];
        let result = GameLoop::new(&mut game).run_game(&mut controllers).unwrap();

        assert!(game.game_over);
        assert!(matches!(
            result.end_reason,
            GameEndReason::PileExhausted(_) | GameEndReason::ThreePilesEmpty
        ));
        assert_eq!(result.scores.len(), 2);
        assert!(!result.winners.is_empty());
    }

    #[test]
    fn test_turn_limit_stops_random_game() {
        let mut game = GameState::new(&GameConfig::new(3).seed(4)).unwrap();
        let mut controllers: Vec<Box<dyn PlayerController>> = (0..3)
            .map(|seat| Box::new(RandomController::new(seat, seat as u64)) as Box<dyn PlayerController>)
            .collect();
        let result = GameLoop::new(&mut game)
            .with_max_turns(3)
            .run_game(&mut controllers)
            .unwrap();
        if result.end_reason == GameEndReason::TurnLimit {
            assert_eq!(result.turns, 4);
            assert!(!game.game_over);
        }
    }

    #[test]
    fn test_repeated_illegal_actions_force_end_turn() {
        let mut game = GameState::new(&GameConfig::new(2).seed(4)).unwrap();
        let script = vec![TurnAction::BuyCard(CardId::Province); 5];
        let mut controllers: Vec<Box<dyn PlayerController>> = vec![
            Box::new(FixedScriptController::new(0, script)),
            Box::new(FixedScriptController::new(1, vec![])),
        ];
        let mut game_loop = GameLoop::new(&mut game).with_max_rejections(2);
        for _ in 0..3 {
            game_loop.step(&mut controllers).unwrap();
        }
        assert_eq!(game_loop.game.current_player, 1);
    }

    #[test]
    fn test_missing_controller_is_an_error() {
        let mut game = GameState::new(&GameConfig::new(2).seed(4)).unwrap();
        let mut controllers: Vec<Box<dyn PlayerController>> = vec![Box::new(HeuristicController::new(1))];
        let err = GameLoop::new(&mut game).step(&mut controllers).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }
}
