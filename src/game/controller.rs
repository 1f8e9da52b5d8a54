//! Player controller trait and game state view
//!
//! This module defines the interface between the game engine and player
//! controllers (AI or human). The driver calls the controller when a
//! decision is needed, and the controller inspects a read-only view of the
//! game to make its choice. A view can be built from a live `GameState` or
//! from a snapshot received over the network, so the same controllers drive
//! local and remote seats.

use crate::core::{CardId, CardType, Player};
use crate::game::interaction::{Interaction, InteractionKind, Selection};
use crate::game::supply::Supply;
use crate::game::{GameState, Phase, TurnAction};
use crate::net::StateSnapshot;
use crate::zones::CardPile;

/// Read-only view of game state for controllers
#[derive(Debug, Clone, Copy)]
pub struct GameStateView<'a> {
    players: &'a [Player],
    supply: &'a Supply,
    trash: &'a CardPile,
    current_player: usize,
    phase: Phase,
    turn_count: u32,
    interaction: Option<&'a Interaction>,
    game_over: bool,
    action_multiplier: u32,
}

impl<'a> GameStateView<'a> {
    pub fn from_state(game: &'a GameState) -> Self {
        GameStateView {
            players: &game.players,
            supply: &game.supply,
            trash: &game.trash,
            current_player: game.current_player,
            phase: game.phase,
            turn_count: game.turn_count,
            interaction: game.current_interaction(),
            game_over: game.game_over,
            action_multiplier: game.action_multiplier,
        }
    }

    pub fn from_snapshot(snapshot: &'a StateSnapshot) -> Self {
        GameStateView {
            players: &snapshot.players,
            supply: &snapshot.supply,
            trash: &snapshot.trash,
            current_player: snapshot.current_player_index,
            phase: snapshot.phase,
            turn_count: snapshot.turn_count,
            interaction: snapshot.interaction.as_ref(),
            game_over: snapshot.game_over,
            action_multiplier: snapshot.action_multiplier,
        }
    }

    pub fn players(&self) -> &'a [Player] {
        self.players
    }

    pub fn player(&self, seat: usize) -> Option<&'a Player> {
        self.players.get(seat)
    }

    /// Cards in a seat's hand (empty for an unknown seat)
    pub fn hand(&self, seat: usize) -> &'a [CardId] {
        self.players.get(seat).map(|p| p.hand.as_slice()).unwrap_or(&[])
    }

    pub fn supply(&self) -> &'a Supply {
        self.supply
    }

    pub fn trash(&self) -> &'a CardPile {
        self.trash
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Head of the interaction queue
    pub fn interaction(&self) -> Option<&'a Interaction> {
        self.interaction
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Seat whose input the game is waiting for
    pub fn active_player(&self) -> usize {
        self.interaction.map(|i| i.target_player).unwrap_or(self.current_player)
    }

    /// Turn actions the current player may take
    ///
    /// Empty once the game is over or while an interaction is pending.
    pub fn legal_actions(&self) -> Vec<TurnAction> {
        let mut actions = Vec::new();
        if self.game_over || self.interaction.is_some() {
            return actions;
        }
        let Some(player) = self.players.get(self.current_player) else {
            return actions;
        };

        let can_act = self.phase.allows_actions() && (player.actions > 0 || self.action_multiplier > 1);
        let mut has_treasure = false;
        for (hand_index, card) in player.hand.iter().enumerate() {
            match card.card_type() {
                CardType::Treasure => {
                    has_treasure = true;
                    actions.push(TurnAction::PlayCard { hand_index });
                }
                CardType::Action | CardType::Reaction if can_act => {
                    actions.push(TurnAction::PlayCard { hand_index });
                }
                _ => {}
            }
        }
        if has_treasure {
            actions.push(TurnAction::PlayAllTreasures);
        }
        if self.phase.allows_actions() {
            actions.push(TurnAction::SkipToBuy);
        }
        if player.buys > 0 {
            for (card, count) in self.supply.iter() {
                if count > 0 && card.cost() <= player.gold {
                    actions.push(TurnAction::BuyCard(card));
                }
            }
        }
        actions.push(TurnAction::EndTurn);
        actions
    }

    /// Indices an interaction accepts, for the seat it targets
    pub fn eligible_indices(&self, interaction: &Interaction) -> Vec<usize> {
        match self.players.get(interaction.target_player) {
            Some(player) => interaction.eligible_indices(&player.hand),
            None => Vec::new(),
        }
    }

    /// Non-empty supply piles a supply interaction accepts
    pub fn eligible_supply(&self, interaction: &Interaction) -> Vec<CardId> {
        self.supply.eligible(&interaction.filter)
    }

    /// Card an interaction index refers to
    pub fn selectable_card(&self, interaction: &Interaction, index: usize) -> Option<CardId> {
        let player = self.players.get(interaction.target_player)?;
        interaction.card_at(&player.hand, index)
    }
}

/// The smallest legal answer to an interaction
///
/// Picks the first `min` eligible cards, the priciest eligible pile, and
/// accepts confirmations.
pub fn minimal_selection(view: &GameStateView, interaction: &Interaction) -> Selection {
    match interaction.kind {
        InteractionKind::HandSelection | InteractionKind::CustomSelection => {
            let eligible = view.eligible_indices(interaction);
            Selection::Cards(eligible.into_iter().take(interaction.min).collect())
        }
        InteractionKind::SupplySelection => {
            let best = view
                .eligible_supply(interaction)
                .into_iter()
                .max_by_key(|c| c.cost())
                .unwrap_or(CardId::Copper);
            Selection::Supply(best)
        }
        InteractionKind::Confirmation => Selection::Confirm(true),
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players or connect to UI.
/// The driver will call these methods when decisions need to be made.
pub trait PlayerController {
    /// Seat this controller is responsible for
    fn player_index(&self) -> usize;

    /// Short label used in logs
    fn name(&self) -> &str;

    /// Choose one of the available turn actions
    ///
    /// `available` is never empty; it always contains `EndTurn`.
    fn choose_action(&mut self, view: &GameStateView, available: &[TurnAction]) -> TurnAction;

    /// Answer the pending interaction, which targets this controller's seat
    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection;

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}

impl<C: PlayerController + ?Sized> PlayerController for Box<C> {
    fn player_index(&self) -> usize {
        (**self).player_index()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_action(&mut self, view: &GameStateView, available: &[TurnAction]) -> TurnAction {
        (**self).choose_action(view, available)
    }

    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection {
        (**self).choose_selection(view, interaction)
    }

    fn on_game_end(&mut self, view: &GameStateView, won: bool) {
        (**self).on_game_end(view, won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::interaction::{CardFilter, Continuation};
    use crate::game::GameConfig;

    fn game() -> GameState {
        GameState::new(&GameConfig::new(2).seed(3)).unwrap()
    }

    #[test]
    fn test_legal_actions_at_start() {
        let mut game = game();
        game.players[0].hand = CardPile::from_cards(vec![CardId::Copper, CardId::Estate, CardId::Village]);
        let actions = GameStateView::from_state(&game).legal_actions();
        assert!(actions.contains(&TurnAction::PlayCard { hand_index: 0 }));
        assert!(!actions.contains(&TurnAction::PlayCard { hand_index: 1 }));
        assert!(actions.contains(&TurnAction::PlayCard { hand_index: 2 }));
        assert!(actions.contains(&TurnAction::PlayAllTreasures));
        assert!(actions.contains(&TurnAction::SkipToBuy));
        // No gold yet: only zero-cost piles
        assert!(actions.contains(&TurnAction::BuyCard(CardId::Copper)));
        assert!(!actions.contains(&TurnAction::BuyCard(CardId::Silver)));
        assert_eq!(actions.last(), Some(&TurnAction::EndTurn));
    }

    #[test]
    fn test_no_actions_while_interaction_pending() {
        let mut game = game();
        game.queue_interaction(Interaction::confirmation("Test", 1, "Ok?", true, Continuation::BanditReveal));
        assert!(game.available_actions().is_empty());
    }

    #[test]
    fn test_action_cards_hidden_in_buy_phase() {
        let mut game = game();
        game.players[0].hand = CardPile::from_cards(vec![CardId::Village, CardId::Copper]);
        game.play_card(0, 1).unwrap();
        let actions = game.available_actions();
        assert!(!actions.contains(&TurnAction::PlayCard { hand_index: 0 }));
        assert!(!actions.contains(&TurnAction::SkipToBuy));
        assert!(actions.contains(&TurnAction::BuyCard(CardId::Copper)));
    }

    #[test]
    fn test_minimal_selection_respects_filter() {
        let mut game = game();
        game.players[0].hand = CardPile::from_cards(vec![CardId::Estate, CardId::Silver, CardId::Copper]);
        let interaction = Interaction::hand("Test", 0, Continuation::MineTrash)
            .exactly(1)
            .filter(CardFilter::OfType(CardType::Treasure));
        let view = GameStateView::from_state(&game);
        assert_eq!(minimal_selection(&view, &interaction), Selection::Cards(vec![1]));

        let gain = Interaction::supply("Test", 0, Continuation::WorkshopGain).filter(CardFilter::CostUpTo(4));
        assert_eq!(minimal_selection(&view, &gain), Selection::Supply(CardId::Smithy));
    }
}
