//! Turn actions: play, buy, phase change, cleanup, interaction answers
//!
//! Every entry point validates before it mutates. A refused action returns
//! `Err`, is reported through the logger, and leaves the state untouched.

use crate::core::player::HAND_SIZE;
use crate::core::{CardId, CardType};
use crate::game::interaction::{InteractionKind, Notice, Selection, ToggleOutcome};
use crate::game::{GameState, GameStateView};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Things the turn owner can do outside an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    PlayCard { hand_index: usize },
    BuyCard(CardId),
    PlayAllTreasures,
    SkipToBuy,
    EndTurn,
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnAction::PlayCard { hand_index } => write!(f, "play card #{}", hand_index),
            TurnAction::BuyCard(card) => write!(f, "buy {}", card),
            TurnAction::PlayAllTreasures => write!(f, "play all treasures"),
            TurnAction::SkipToBuy => write!(f, "skip to buy"),
            TurnAction::EndTurn => write!(f, "end turn"),
        }
    }
}

impl GameState {
    /// Log a refusal and build the matching error
    pub(crate) fn reject(&self, msg: impl Into<String>) -> GameError {
        let msg = msg.into();
        self.logger.rejected(&msg);
        GameError::illegal(msg)
    }

    fn reject_selection(&self, msg: impl Into<String>) -> GameError {
        let msg = msg.into();
        self.logger.rejected(&msg);
        GameError::invalid_selection(msg)
    }

    /// Common guard for turn actions
    fn ensure_turn(&self, player: usize) -> Result<()> {
        if self.game_over {
            return Err(self.reject("The game is over."));
        }
        if player != self.current_player {
            let name = self.players.get(player).map(|p| p.name.as_str()).unwrap_or("Unknown player");
            return Err(self.reject(format!("It is not {}'s turn.", name)));
        }
        if !self.interactions.is_empty() {
            return Err(self.reject("Resolve the pending choice first."));
        }
        Ok(())
    }

    /// Apply any turn action
    pub fn apply(&mut self, player: usize, action: &TurnAction) -> Result<()> {
        match *action {
            TurnAction::PlayCard { hand_index } => self.play_card(player, hand_index),
            TurnAction::BuyCard(card) => self.buy_card(player, card),
            TurnAction::PlayAllTreasures => self.play_all_treasures(player),
            TurnAction::SkipToBuy => self.skip_to_buy(player),
            TurnAction::EndTurn => self.end_turn(player),
        }
    }

    /// Legal turn actions for the current player (empty while a choice is pending)
    pub fn available_actions(&self) -> Vec<TurnAction> {
        GameStateView::from_state(self).legal_actions()
    }

    /// Play the card at `hand_index`
    pub fn play_card(&mut self, player: usize, hand_index: usize) -> Result<()> {
        self.ensure_turn(player)?;
        let Some(card) = self.players[player].hand.get(hand_index) else {
            return Err(self.reject("No card at that position."));
        };
        match card.card_type() {
            CardType::Victory | CardType::Curse => {
                return Err(self.reject(format!("{} cannot be played.", card)));
            }
            CardType::Action | CardType::Reaction => {
                if !self.phase.allows_actions() {
                    return Err(self.reject("Action cards can only be played in the Action phase."));
                }
                if self.players[player].actions == 0 && self.action_multiplier == 1 {
                    return Err(self.reject("You have no Actions remaining."));
                }
            }
            CardType::Treasure => {}
        }
        self.play_from_hand(player, hand_index, true);
        Ok(())
    }

    /// Move a card from hand to play and resolve it, without the turn checks
    ///
    /// `spend_action` is false for cards played by another card's effect.
    pub(crate) fn play_from_hand(&mut self, player: usize, hand_index: usize, spend_action: bool) {
        let Some(card) = self.players[player].hand.remove_at(hand_index) else {
            return;
        };
        self.players[player].play_area.add(card);

        if card.is_treasure() {
            let gold = self.treasure_value(card);
            self.players[player].gold += gold;
            self.phase.advance_to_buy();
            let name = self.players[player].name.clone();
            self.record(format!("{} plays {}", name, card));
            return;
        }

        if !card.is_action() {
            return;
        }

        let times = self.action_multiplier.max(1);
        if spend_action && self.action_multiplier == 1 {
            let p = &mut self.players[player];
            p.actions = p.actions.saturating_sub(1);
        }

        let def = card.def();
        for repetition in 0..times {
            let name = self.players[player].name.clone();
            if repetition > 0 {
                self.record(format!("{} plays {} (Second Cast)", name, card));
            } else {
                self.record(format!("{} plays {}", name, card));
            }

            let p = &mut self.players[player];
            p.actions += def.actions;
            p.buys += def.buys;
            p.gold += def.gold;
            if def.cards > 0 {
                self.draw(player, def.cards as usize);
            }

            self.apply_card_effect(player, card, repetition);
        }

        if card == CardId::ThroneRoom {
            self.action_multiplier = 2;
            let name = self.players[player].name.clone();
            self.record(format!("> {} must choose an Action to duplicate.", name));
        } else {
            self.action_multiplier = 1;
        }
    }

    /// Coins a treasure adds right now, including the Merchant bonus on the
    /// first Silver of the turn
    fn treasure_value(&mut self, card: CardId) -> u32 {
        let mut value = card.def().value;
        if card == CardId::Silver && !self.turn.silver_played {
            self.turn.silver_played = true;
            value += self.turn.merchants_played;
        }
        value
    }

    /// Buy one copy of `card`
    pub fn buy_card(&mut self, player: usize, card: CardId) -> Result<()> {
        self.ensure_turn(player)?;
        if self.supply.count(card) < 1 {
            return Err(self.reject("Cannot buy: Pile is empty."));
        }
        let p = &self.players[player];
        if p.buys < 1 {
            return Err(self.reject("Cannot buy: No buys remaining."));
        }
        if p.gold < card.cost() {
            return Err(self.reject("Cannot buy: Insufficient gold."));
        }

        self.supply.take(card);
        let p = &mut self.players[player];
        p.gold -= card.cost();
        p.buys -= 1;
        p.discard.add(card);
        self.phase.advance_to_buy();

        let name = self.players[player].name.clone();
        self.record(format!("{} bought {}.", name, card));
        self.check_game_over();
        Ok(())
    }

    /// Play every Treasure in hand at once
    pub fn play_all_treasures(&mut self, player: usize) -> Result<()> {
        self.ensure_turn(player)?;
        let indices = self.players[player].hand_indices_where(|c| c.is_treasure());
        if indices.is_empty() {
            return Err(self.reject("No treasures to play."));
        }

        let treasures = self.players[player].hand.remove_indices(&indices);
        let total: u32 = treasures.iter().map(|&c| self.treasure_value(c)).sum();
        let p = &mut self.players[player];
        p.play_area.extend(treasures);
        p.gold += total;
        self.phase.advance_to_buy();

        let name = self.players[player].name.clone();
        self.record(format!("{} played all treasures (+{} Gold).", name, total));
        Ok(())
    }

    /// Leave the Action phase without playing a Treasure
    pub fn skip_to_buy(&mut self, player: usize) -> Result<()> {
        self.ensure_turn(player)?;
        if !self.phase.allows_actions() {
            return Err(self.reject("Already in the Buy phase."));
        }
        self.phase.advance_to_buy();
        let name = self.players[player].name.clone();
        self.record(format!("{} moves to the Buy phase.", name));
        Ok(())
    }

    /// Cleanup and pass the turn
    ///
    /// Hand and play area go to discard, five new cards are drawn, counters
    /// reset, and the next seat becomes current.
    pub fn end_turn(&mut self, player: usize) -> Result<()> {
        self.ensure_turn(player)?;

        let p = &mut self.players[player];
        let hand = p.hand.take_all();
        let played = p.play_area.take_all();
        p.discard.extend(hand);
        p.discard.extend(played);
        p.reset_resources();
        self.draw(player, HAND_SIZE);

        let next = (player + 1) % self.players.len();
        self.current_player = next;
        if next == 0 {
            self.turn_count += 1;
        }
        self.phase = Default::default();
        self.action_multiplier = 1;
        self.interactions.clear();
        self.turn = Default::default();

        let name = self.players[player].name.clone();
        self.record(format!("{} ended turn", name));
        Ok(())
    }

    /// Set the game-over flag if the supply says so
    pub(crate) fn check_game_over(&mut self) {
        if self.game_over {
            return;
        }
        if let Some(reason) = self.supply.exhaustion() {
            self.game_over = true;
            self.end_reason = Some(reason);
            self.record(format!("Game over: {}.", reason));
        }
    }

    /// Answer the head interaction on behalf of `player`
    pub fn resolve_interaction(&mut self, player: usize, selection: Selection) -> Result<()> {
        let Some(head) = self.interactions.current() else {
            self.logger.rejected("No pending interaction.");
            return Err(GameError::NoPendingInteraction);
        };
        if head.target_player != player {
            let waiting = self.players[head.target_player].name.clone();
            return Err(self.reject(format!("Waiting for {} to choose.", waiting)));
        }
        self.validate_selection(&selection)?;

        let Some(interaction) = self.interactions.pop() else {
            return Err(GameError::NoPendingInteraction);
        };
        self.run_continuation(interaction, selection);
        self.settle_head();
        Ok(())
    }

    /// Check an answer against the head interaction's kind, bounds and filter
    pub fn validate_selection(&self, selection: &Selection) -> Result<()> {
        let Some(head) = self.interactions.current() else {
            return Err(GameError::NoPendingInteraction);
        };
        let hand = &self.players[head.target_player].hand;

        match (head.kind, selection) {
            (InteractionKind::HandSelection | InteractionKind::CustomSelection, Selection::Cards(indices)) => {
                let mut seen = indices.clone();
                seen.sort_unstable();
                seen.dedup();
                if seen.len() != indices.len() {
                    return Err(self.reject_selection("The same card was selected twice."));
                }
                for &index in indices {
                    let Some(card) = head.card_at(hand, index) else {
                        return Err(self.reject_selection(format!("No card at position {}.", index)));
                    };
                    if !head.filter.matches(card) {
                        return Err(self.reject_selection(format!("{} cannot be selected.", card)));
                    }
                }
                if indices.len() < head.min {
                    return Err(self.reject_selection(format!("Select at least {}.", head.min)));
                }
                if let Some(max) = head.max {
                    if indices.len() > max {
                        return Err(self.reject_selection(format!("Select at most {}.", max)));
                    }
                }
                Ok(())
            }
            (InteractionKind::SupplySelection, Selection::Supply(card)) => {
                if !head.filter.matches(*card) {
                    return Err(self.reject_selection("Invalid Selection"));
                }
                if self.supply.count(*card) < 1 {
                    return Err(self.reject_selection("Empty Pile"));
                }
                Ok(())
            }
            (InteractionKind::Confirmation, Selection::Confirm(accept)) => {
                if !accept && !head.allows_decline() {
                    return Err(self.reject_selection("This choice cannot be declined."));
                }
                Ok(())
            }
            _ => Err(self.reject_selection(format!("Wrong kind of answer for {}.", head.source))),
        }
    }

    /// Toggle one index of the pending selection
    pub fn toggle_selection(&mut self, player: usize, index: usize) -> ToggleOutcome {
        let card = match self.interactions.current() {
            Some(head) if head.target_player == player => head.card_at(&self.players[player].hand, index),
            _ => return ToggleOutcome::Rejected(Notice::NotSelectable),
        };
        let outcome = self.interactions.toggle(index, card);
        if let ToggleOutcome::Rejected(notice) = &outcome {
            self.logger.rejected(&notice.to_string());
        }
        outcome
    }

    /// Submit the toggled selection (or accept a confirmation)
    pub fn confirm_selection(&mut self, player: usize) -> Result<()> {
        let Some(head) = self.interactions.current() else {
            return Err(GameError::NoPendingInteraction);
        };
        let selection = match head.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => {
                Selection::Cards(self.interactions.selected().to_vec())
            }
            InteractionKind::Confirmation => Selection::Confirm(true),
            InteractionKind::SupplySelection => {
                return Err(self.reject_selection("Pick a supply pile."));
            }
        };
        self.resolve_interaction(player, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Phase};
    use crate::zones::CardPile;

    fn game() -> GameState {
        let mut game = GameState::new(&GameConfig::new(2).seed(11)).unwrap();
        game.logger.enable_capture();
        game
    }

    fn set_hand(game: &mut GameState, player: usize, cards: &[CardId]) {
        game.players[player].hand = CardPile::from_cards(cards.to_vec());
    }

    #[test]
    fn test_treasure_moves_to_buy_phase() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Copper, CardId::Silver]);
        game.play_card(0, 1).unwrap();
        assert_eq!(game.phase, Phase::Buy);
        assert_eq!(game.players[0].gold, 2);
        assert_eq!(game.players[0].play_area.as_slice(), &[CardId::Silver]);
    }

    #[test]
    fn test_action_rejected_in_buy_phase() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Copper, CardId::Village]);
        game.play_card(0, 0).unwrap();
        let before = game.fingerprint().unwrap();
        assert!(game.play_card(0, 0).is_err());
        assert_eq!(game.fingerprint().unwrap(), before);
        assert_eq!(game.logger.logs().in_category("rejected").len(), 1);
    }

    #[test]
    fn test_victory_cards_are_not_playable() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Estate]);
        assert!(matches!(game.play_card(0, 0), Err(GameError::IllegalAction(_))));
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut game = game();
        assert!(game.end_turn(1).is_err());
        assert!(game.buy_card(1, CardId::Copper).is_err());
        assert_eq!(game.current_player, 0);
    }

    #[test]
    fn test_buy_failures_leave_state_identical() {
        let mut game = game();
        let before = game.fingerprint().unwrap();

        game.players[0].gold = 0;
        let before_gold = game.fingerprint().unwrap();
        assert!(game.buy_card(0, CardId::Province).is_err());
        assert_eq!(game.fingerprint().unwrap(), before_gold);

        game.players[0].gold = 10;
        game.players[0].buys = 0;
        let before_buys = game.fingerprint().unwrap();
        assert!(game.buy_card(0, CardId::Silver).is_err());
        assert_eq!(game.fingerprint().unwrap(), before_buys);

        game.players[0].buys = 1;
        game.supply.insert(CardId::Smithy, 0);
        let before_pile = game.fingerprint().unwrap();
        assert!(game.buy_card(0, CardId::Smithy).is_err());
        assert_eq!(game.fingerprint().unwrap(), before_pile);

        assert!(game.buy_card(0, CardId::Witch).is_err());
        assert_ne!(before, before_pile);
    }

    #[test]
    fn test_buy_updates_resources() {
        let mut game = game();
        game.players[0].gold = 5;
        game.buy_card(0, CardId::Silver).unwrap();
        let p = &game.players[0];
        assert_eq!((p.gold, p.buys), (2, 0));
        assert_eq!(p.discard.as_slice(), &[CardId::Silver]);
        assert_eq!(game.supply.count(CardId::Silver), 39);
        assert_eq!(game.phase, Phase::Buy);
        assert_eq!(game.log.last().unwrap(), "Player 1 bought Silver.");
    }

    #[test]
    fn test_play_all_treasures() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Copper, CardId::Estate, CardId::Gold, CardId::Copper]);
        game.play_all_treasures(0).unwrap();
        assert_eq!(game.players[0].gold, 5);
        assert_eq!(game.players[0].hand.as_slice(), &[CardId::Estate]);
        assert_eq!(game.log.last().unwrap(), "Player 1 played all treasures (+5 Gold).");
        assert!(game.play_all_treasures(0).is_err());
    }

    #[test]
    fn test_skip_to_buy_is_one_way() {
        let mut game = game();
        game.skip_to_buy(0).unwrap();
        assert_eq!(game.phase, Phase::Buy);
        assert!(game.skip_to_buy(0).is_err());
    }

    #[test]
    fn test_end_turn_cleanup() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Copper, CardId::Copper]);
        game.play_card(0, 0).unwrap();
        game.players[0].actions = 4;
        game.players[0].buys = 3;
        game.action_multiplier = 2;

        game.end_turn(0).unwrap();
        let p = &game.players[0];
        assert_eq!((p.actions, p.buys, p.gold), (1, 1, 0));
        assert!(p.play_area.is_empty());
        assert_eq!(p.hand.len(), 5);
        assert_eq!(game.current_player, 1);
        assert_eq!(game.turn_count, 1);
        assert_eq!(game.action_multiplier, 1);
        assert_eq!(game.phase, Phase::Action);

        game.end_turn(1).unwrap();
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turn_count, 2);
    }

    #[test]
    fn test_merchant_bonus_on_first_silver_only() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Merchant, CardId::Silver, CardId::Silver]);
        game.play_card(0, 0).unwrap();
        let silver = game.players[0].hand_indices_where(|c| c == CardId::Silver)[0];
        game.play_card(0, silver).unwrap();
        assert_eq!(game.players[0].gold, 3);
        let silver = game.players[0].hand_indices_where(|c| c == CardId::Silver)[0];
        game.play_card(0, silver).unwrap();
        assert_eq!(game.players[0].gold, 5);
    }

    #[test]
    fn test_actions_blocked_while_interaction_pending() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Cellar, CardId::Copper, CardId::Estate]);
        game.play_card(0, 0).unwrap();
        assert!(game.current_interaction().is_some());
        let before = game.fingerprint().unwrap();
        assert!(game.play_card(0, 0).is_err());
        assert!(game.buy_card(0, CardId::Copper).is_err());
        assert!(game.end_turn(0).is_err());
        assert_eq!(game.fingerprint().unwrap(), before);
        assert!(game.available_actions().is_empty());
    }

    #[test]
    fn test_resolve_wrong_player_or_kind() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Workshop]);
        game.play_card(0, 0).unwrap();
        assert!(game.resolve_interaction(1, Selection::Supply(CardId::Silver)).is_err());
        assert!(matches!(
            game.resolve_interaction(0, Selection::Cards(vec![0])),
            Err(GameError::InvalidSelection(_))
        ));
        assert!(matches!(
            game.resolve_interaction(0, Selection::Supply(CardId::Gold)),
            Err(GameError::InvalidSelection(_))
        ));
        game.resolve_interaction(0, Selection::Supply(CardId::Silver)).unwrap();
        assert!(matches!(
            game.resolve_interaction(0, Selection::Confirm(true)),
            Err(GameError::NoPendingInteraction)
        ));
    }

    #[test]
    fn test_toggle_and_confirm() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Chapel, CardId::Estate, CardId::Copper, CardId::Estate]);
        game.play_card(0, 0).unwrap();
        assert_eq!(game.toggle_selection(0, 0), ToggleOutcome::Selected);
        assert_eq!(game.toggle_selection(0, 2), ToggleOutcome::Selected);
        assert_eq!(game.toggle_selection(1, 1), ToggleOutcome::Rejected(Notice::NotSelectable));
        game.confirm_selection(0).unwrap();
        assert_eq!(game.players[0].hand.as_slice(), &[CardId::Copper]);
        assert_eq!(game.trash.count(CardId::Estate), 2);
    }
}
