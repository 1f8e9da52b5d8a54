//! Random AI controller for testing and baseline gameplay
//!
//! Makes uniformly random legal choices. Always seeded, so a game between
//! random controllers replays exactly.

use crate::game::controller::{minimal_selection, GameStateView, PlayerController};
use crate::game::interaction::{Interaction, InteractionKind, Selection};
use crate::game::TurnAction;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A controller that makes random choices
pub struct RandomController {
    player_index: usize,
    rng: ChaCha12Rng,
}

impl RandomController {
    pub fn new(player_index: usize, seed: u64) -> Self {
        RandomController {
            player_index,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn player_index(&self) -> usize {
        self.player_index
    }

    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, _view: &GameStateView, available: &[TurnAction]) -> TurnAction {
        available.choose(&mut self.rng).cloned().unwrap_or(TurnAction::EndTurn)
    }

    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection {
        match interaction.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => {
                let mut eligible = view.eligible_indices(interaction);
                let upper = interaction.max.unwrap_or(eligible.len()).min(eligible.len());
                let lower = interaction.min.min(upper);
                let count = self.rng.gen_range(lower..=upper);
                eligible.shuffle(&mut self.rng);
                eligible.truncate(count);
                eligible.sort_unstable();
                Selection::Cards(eligible)
            }
            InteractionKind::SupplySelection => match view.eligible_supply(interaction).choose(&mut self.rng) {
                Some(&card) => Selection::Supply(card),
                None => minimal_selection(view, interaction),
            },
            InteractionKind::Confirmation => {
                Selection::Confirm(!interaction.allows_decline() || self.rng.gen_bool(0.5))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::game::interaction::Continuation;
    use crate::game::{GameConfig, GameState};
    use crate::zones::CardPile;

    #[test]
    fn test_chooses_from_available() {
        let game = GameState::new(&GameConfig::new(2).seed(5)).unwrap();
        let view = GameStateView::from_state(&game);
        let mut controller = RandomController::new(0, 42);
        let actions = view.legal_actions();
        for _ in 0..20 {
            let action = controller.choose_action(&view, &actions);
            assert!(actions.contains(&action));
        }
    }

    #[test]
    fn test_selection_within_bounds() {
        let mut game = GameState::new(&GameConfig::new(2).seed(5)).unwrap();
        game.players[0].hand = CardPile::from_cards(vec![
            CardId::Copper,
            CardId::Estate,
            CardId::Estate,
            CardId::Silver,
            CardId::Gold,
        ]);
        let interaction = Interaction::hand("Test", 0, Continuation::ChapelTrash).bounds(1, Some(4));
        let view = GameStateView::from_state(&game);
        let mut controller = RandomController::new(0, 7);
        for _ in 0..50 {
            let Selection::Cards(picked) = controller.choose_selection(&view, &interaction) else {
                panic!("expected a card selection");
            };
            assert!((1..=4).contains(&picked.len()));
            assert!(picked.iter().all(|&i| i < 5));
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let game = GameState::new(&GameConfig::new(2).seed(5)).unwrap();
        let view = GameStateView::from_state(&game);
        let actions = view.legal_actions();
        let mut a = RandomController::new(0, 99);
        let mut b = RandomController::new(0, 99);
        for _ in 0..10 {
            assert_eq!(a.choose_action(&view, &actions), b.choose_action(&view, &actions));
        }
    }
}
