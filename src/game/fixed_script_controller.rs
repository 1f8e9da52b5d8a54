//! Fixed script controller for deterministic testing
//!
//! This controller follows a predetermined sequence of turn actions and
//! interaction answers, making it ideal for testing specific game scenarios.
//! Once a script is exhausted it ends the turn, or gives the smallest legal
//! answer to an interaction.

use crate::game::controller::{minimal_selection, GameStateView, PlayerController};
use crate::game::interaction::{Interaction, Selection};
use crate::game::TurnAction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A controller that follows a fixed script of choices for testing
///
/// The controller is serializable, so its position in the script can be
/// saved alongside a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedScriptController {
    player_index: usize,
    actions: VecDeque<TurnAction>,
    selections: VecDeque<Selection>,
}

impl FixedScriptController {
    /// # Example
    /// ```
    /// use wickinion::game::{FixedScriptController, TurnAction};
    ///
    /// let controller = FixedScriptController::new(0, vec![TurnAction::PlayAllTreasures, TurnAction::EndTurn]);
    /// assert_eq!(controller.remaining_actions(), 2);
    /// ```
    pub fn new(player_index: usize, actions: Vec<TurnAction>) -> Self {
        FixedScriptController {
            player_index,
            actions: actions.into(),
            selections: VecDeque::new(),
        }
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections.into();
        self
    }

    pub fn remaining_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn remaining_selections(&self) -> usize {
        self.selections.len()
    }
}

impl PlayerController for FixedScriptController {
    fn player_index(&self) -> usize {
        self.player_index
    }

    fn name(&self) -> &str {
        "script"
    }

    /// Scripted steps are returned even when not in `available`; the
    /// engine refuses illegal ones, which is what some tests want.
    fn choose_action(&mut self, _view: &GameStateView, _available: &[TurnAction]) -> TurnAction {
        self.actions.pop_front().unwrap_or(TurnAction::EndTurn)
    }

    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection {
        self.selections
            .pop_front()
            .unwrap_or_else(|| minimal_selection(view, interaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::game::interaction::Continuation;
    use crate::game::{GameConfig, GameState};

    #[test]
    fn test_follows_script_then_ends_turn() {
        let game = GameState::new(&GameConfig::new(2).seed(1)).unwrap();
        let view = GameStateView::from_state(&game);
        let mut controller = FixedScriptController::new(
            0,
            vec![TurnAction::PlayAllTreasures, TurnAction::BuyCard(CardId::Silver)],
        );

        assert_eq!(controller.choose_action(&view, &[]), TurnAction::PlayAllTreasures);
        assert_eq!(controller.choose_action(&view, &[]), TurnAction::BuyCard(CardId::Silver));
        assert_eq!(controller.choose_action(&view, &[]), TurnAction::EndTurn);
    }

    #[test]
    fn test_selection_falls_back_to_minimum() {
        let game = GameState::new(&GameConfig::new(2).seed(1)).unwrap();
        let view = GameStateView::from_state(&game);
        let interaction = Interaction::confirmation("Test", 0, "Go?", false, Continuation::BanditReveal);
        let mut controller =
            FixedScriptController::new(0, vec![]).with_selections(vec![Selection::Confirm(false)]);

        assert_eq!(controller.choose_selection(&view, &interaction), Selection::Confirm(false));
        assert_eq!(controller.choose_selection(&view, &interaction), Selection::Confirm(true));
        assert_eq!(controller.remaining_selections(), 0);
    }
}
