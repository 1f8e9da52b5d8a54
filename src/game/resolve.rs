//! Continuation steps run when an interaction is answered
//!
//! The head interaction has already been popped when these run, so any
//! follow-up queued here lands behind everything that was already waiting.

use crate::core::{CardId, CardType};
use crate::game::interaction::{CardFilter, Continuation, Interaction, Selection};
use crate::game::state::GainDestination;
use crate::game::GameState;

const MONEYLENDER_COINS: u32 = 3;
const MINE_UPGRADE: u32 = 3;
const REMODEL_UPGRADE: u32 = 2;

impl GameState {
    pub(crate) fn run_continuation(&mut self, interaction: Interaction, selection: Selection) {
        let player = interaction.target_player;
        let name = self.players[player].name.clone();
        let picked = match &selection {
            Selection::Cards(indices) => indices.clone(),
            _ => Vec::new(),
        };

        match interaction.continuation {
            Continuation::CellarDiscard => {
                let discarded = self.players[player].hand.remove_indices(&picked);
                let n = discarded.len();
                self.players[player].discard.extend(discarded);
                self.draw(player, n);
                self.record(format!("{} discarded {} cards and drew {}.", name, n, n));
            }
            Continuation::ChapelTrash => {
                let trashed = self.players[player].hand.remove_indices(&picked);
                let n = trashed.len();
                self.trash.extend(trashed);
                self.record(format!("{} trashed {} cards.", name, n));
            }
            Continuation::SentryTrash => {
                let (trashed, kept) = split_custom(&interaction.custom_cards, &picked);
                if !trashed.is_empty() {
                    self.record(format!("{} trashed {} cards with {}.", name, trashed.len(), CardId::Sentry));
                    self.trash.extend(trashed);
                }
                if !kept.is_empty() {
                    let max = kept.len();
                    self.queue_interaction(
                        Interaction::custom(
                            format!("{} (Discard)", CardId::Sentry),
                            player,
                            kept,
                            Continuation::SentryDiscard,
                        )
                        .bounds(0, Some(max))
                        .label("Discard Selected"),
                    );
                }
            }
            Continuation::SentryDiscard => {
                let (discarded, kept) = split_custom(&interaction.custom_cards, &picked);
                let p = &mut self.players[player];
                let (d, k) = (discarded.len(), kept.len());
                p.discard.extend(discarded);
                p.deck.extend(kept);
                if d > 0 {
                    self.record(format!("{} discarded {} cards.", name, d));
                }
                if k > 0 {
                    self.record(format!("{} put {} cards back on deck.", name, k));
                }
            }
            Continuation::HarbingerTopdeck => {
                let Some(card) = picked.first().and_then(|&i| interaction.custom_cards.get(i).copied()) else {
                    return;
                };
                let p = &mut self.players[player];
                if p.discard.remove(card) {
                    p.deck.add_to_top(card);
                    self.record(format!("{} put {} from discard onto deck.", name, card));
                } else {
                    self.record(format!("{} is no longer in {}'s discard pile.", card, name));
                }
            }
            Continuation::VassalPlay { card } => {
                if selection != Selection::Confirm(true) {
                    self.record(format!("{} leaves {} in the discard pile.", name, card));
                    return;
                }
                let p = &mut self.players[player];
                if !p.discard.remove_last(card) {
                    self.record(format!("{} is no longer in {}'s discard pile.", card, name));
                    return;
                }
                p.hand.add(card);
                let index = p.hand.len() - 1;
                self.play_from_hand(player, index, false);
            }
            Continuation::WorkshopGain => {
                if let Selection::Supply(card) = selection {
                    if self.gain(player, card, GainDestination::Discard) {
                        self.record(format!("{} gained {} via {}.", name, card, CardId::Workshop));
                    }
                }
            }
            Continuation::ArtisanGain => {
                if let Selection::Supply(card) = selection {
                    if self.gain(player, card, GainDestination::Hand) {
                        self.record(format!("{} gained {} to hand.", name, card));
                    }
                    self.queue_interaction(
                        Interaction::hand(
                            format!("{} (Put back)", CardId::Artisan),
                            player,
                            Continuation::ArtisanTopdeck,
                        )
                        .exactly(1)
                        .label("Put on Deck"),
                    );
                }
            }
            Continuation::ArtisanTopdeck => {
                let p = &mut self.players[player];
                for card in p.hand.remove_indices(&picked) {
                    p.deck.add_to_top(card);
                }
                self.record(format!("{} put a card onto their deck.", name));
            }
            Continuation::MineTrash => {
                if let Some(trashed) = self.trash_one(player, &picked) {
                    self.queue_interaction(
                        Interaction::supply(CardId::Mine.name(), player, Continuation::MineGain)
                            .filter(CardFilter::TreasureCostUpTo(trashed.cost() + MINE_UPGRADE)),
                    );
                }
            }
            Continuation::MineGain => {
                if let Selection::Supply(card) = selection {
                    if self.gain(player, card, GainDestination::Hand) {
                        self.record(format!("{} mined {} into hand.", name, card));
                    }
                }
            }
            Continuation::RemodelTrash => {
                if let Some(trashed) = self.trash_one(player, &picked) {
                    self.queue_interaction(
                        Interaction::supply(CardId::Remodel.name(), player, Continuation::RemodelGain)
                            .filter(CardFilter::CostUpTo(trashed.cost() + REMODEL_UPGRADE)),
                    );
                }
            }
            Continuation::RemodelGain => {
                if let Selection::Supply(card) = selection {
                    if self.gain(player, card, GainDestination::Discard) {
                        self.record(format!("{} remodeled into {}.", name, card));
                    }
                }
            }
            Continuation::MoneylenderTrash => {
                let trashed = self.players[player].hand.remove_indices(&picked);
                if trashed.is_empty() {
                    self.record(format!("{} chose not to trash a {}.", name, CardId::Copper));
                } else {
                    self.trash.extend(trashed);
                    self.players[player].gold += MONEYLENDER_COINS;
                    self.record(format!(
                        "{} trashed a {} for +{} Gold.",
                        name,
                        CardId::Copper,
                        MONEYLENDER_COINS
                    ));
                }
            }
            Continuation::PoacherDiscard => {
                let discarded = self.players[player].hand.remove_indices(&picked);
                let n = discarded.len();
                self.players[player].discard.extend(discarded);
                self.record(format!("{} discarded {} cards due to empty piles.", name, n));
            }
            Continuation::MilitiaDiscard => {
                let discarded = self.players[player].hand.remove_indices(&picked);
                self.players[player].discard.extend(discarded);
                self.record(format!("{} discarded down to {} cards.", name, self.players[player].hand.len()));
            }
            Continuation::BanditReveal => self.bandit_reveal(player),
            Continuation::BureaucratTopdeck => {
                let p = &mut self.players[player];
                let cards = p.hand.remove_indices(&picked);
                for &card in &cards {
                    p.deck.add_to_top(card);
                }
                if let Some(card) = cards.first() {
                    self.record(format!("{} put a {} on their deck.", name, card));
                }
            }
        }
    }

    /// Trash the single picked hand card and log it
    fn trash_one(&mut self, player: usize, picked: &[usize]) -> Option<CardId> {
        let index = *picked.first()?;
        let card = self.players[player].hand.remove_at(index)?;
        self.trash.add(card);
        let name = self.players[player].name.clone();
        self.record(format!("{} trashed {}.", name, card));
        Some(card)
    }

    /// Victim reveals the top two cards, trashes the first non-Copper
    /// Treasure among them and discards the rest
    fn bandit_reveal(&mut self, victim: usize) {
        let revealed: Vec<CardId> = (0..2).filter_map(|_| self.reveal_top(victim)).collect();
        let name = self.players[victim].name.clone();
        let target = revealed
            .iter()
            .position(|c| c.card_type() == CardType::Treasure && *c != CardId::Copper);

        let mut kept = revealed;
        match target {
            Some(i) => {
                let card = kept.remove(i);
                self.trash.add(card);
                self.record(format!("{} trashed {} due to {}.", name, card, CardId::Bandit));
            }
            None => self.record(format!("{} revealed no trashable treasures.", name)),
        }
        self.players[victim].discard.extend(kept);
    }
}

/// Split a custom card list into (picked, rest), both in list order
fn split_custom(cards: &[CardId], picked: &[usize]) -> (Vec<CardId>, Vec<CardId>) {
    let mut chosen = Vec::new();
    let mut rest = Vec::new();
    for (i, &card) in cards.iter().enumerate() {
        if picked.contains(&i) {
            chosen.push(card);
        } else {
            rest.push(card);
        }
    }
    (chosen, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::zones::CardPile;

    fn game() -> GameState {
        let mut game = GameState::new(&GameConfig::new(2).seed(21)).unwrap();
        game.logger.enable_capture();
        game
    }

    fn set_hand(game: &mut GameState, player: usize, cards: &[CardId]) {
        game.players[player].hand = CardPile::from_cards(cards.to_vec());
    }

    #[test]
    fn test_split_custom() {
        let (a, b) = split_custom(&[CardId::Gold, CardId::Estate, CardId::Curse], &[2, 0]);
        assert_eq!(a, vec![CardId::Gold, CardId::Curse]);
        assert_eq!(b, vec![CardId::Estate]);
    }

    #[test]
    fn test_cellar_discard_and_draw() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Cellar, CardId::Estate, CardId::Estate, CardId::Copper]);
        game.players[0].deck = CardPile::from_cards(vec![CardId::Gold, CardId::Gold]);
        game.play_card(0, 0).unwrap();
        game.resolve_interaction(0, Selection::Cards(vec![0, 1])).unwrap();
        let p = &game.players[0];
        assert_eq!(p.hand.as_slice(), &[CardId::Copper, CardId::Gold, CardId::Gold]);
        assert_eq!(p.discard.count(CardId::Estate), 2);
        assert_eq!(p.actions, 1);
    }

    #[test]
    fn test_sentry_two_stages() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Sentry]);
        game.players[0].deck = CardPile::from_cards(vec![CardId::Gold, CardId::Curse, CardId::Estate, CardId::Copper]);
        let census = game.card_census();
        game.play_card(0, 0).unwrap();

        // Drew Copper, revealed Estate then Curse
        let head = game.current_interaction().unwrap().clone();
        assert_eq!(head.custom_cards, vec![CardId::Estate, CardId::Curse]);
        assert_eq!(game.interactions.len(), 1);
        assert_eq!(game.card_census(), census);

        game.resolve_interaction(0, Selection::Cards(vec![1])).unwrap();
        let head = game.current_interaction().unwrap().clone();
        assert_eq!(head.continuation, Continuation::SentryDiscard);
        assert_eq!(head.custom_cards, vec![CardId::Estate]);
        assert_eq!(game.trash.as_slice(), &[CardId::Curse]);

        game.resolve_interaction(0, Selection::Cards(vec![])).unwrap();
        assert_eq!(game.players[0].deck.peek_top(), Some(CardId::Estate));
        assert!(game.interactions.is_empty());
        assert_eq!(game.card_census(), census);
    }

    #[test]
    fn test_remodel_gain_limited_by_trashed_cost() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Remodel, CardId::Estate]);
        game.play_card(0, 0).unwrap();
        game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();
        let head = game.current_interaction().unwrap();
        assert_eq!(head.filter, CardFilter::CostUpTo(4));
        assert!(game.resolve_interaction(0, Selection::Supply(CardId::Duchy)).is_err());
        game.resolve_interaction(0, Selection::Supply(CardId::Smithy)).unwrap();
        assert_eq!(game.players[0].discard.as_slice(), &[CardId::Smithy]);
        assert_eq!(game.trash.as_slice(), &[CardId::Estate]);
    }

    #[test]
    fn test_artisan_gain_then_topdeck() {
        let mut game = GameState::new(&GameConfig::new(2).preset("size_distortion").seed(4)).unwrap();
        set_hand(&mut game, 0, &[CardId::Artisan, CardId::Copper]);
        game.play_card(0, 0).unwrap();
        game.resolve_interaction(0, Selection::Supply(CardId::Witch)).unwrap();
        assert_eq!(game.players[0].hand.as_slice(), &[CardId::Copper, CardId::Witch]);
        game.resolve_interaction(0, Selection::Cards(vec![1])).unwrap();
        assert_eq!(game.players[0].deck.peek_top(), Some(CardId::Witch));
        assert_eq!(game.players[0].hand.as_slice(), &[CardId::Copper]);
    }

    #[test]
    fn test_moneylender_optional() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Moneylender, CardId::Copper]);
        game.play_card(0, 0).unwrap();
        game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();
        assert_eq!(game.players[0].gold, 3);
        assert_eq!(game.trash.as_slice(), &[CardId::Copper]);
    }

    #[test]
    fn test_bandit_trashes_silver_not_copper() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Bandit]);
        game.players[1].deck = CardPile::from_cards(vec![CardId::Silver, CardId::Copper]);
        game.play_card(0, 0).unwrap();
        assert_eq!(game.players[0].gold, 1);
        assert!(game.resolve_interaction(1, Selection::Confirm(false)).is_err());
        game.resolve_interaction(1, Selection::Confirm(true)).unwrap();
        assert_eq!(game.trash.as_slice(), &[CardId::Silver]);
        assert_eq!(game.players[1].discard.as_slice(), &[CardId::Copper]);
    }

    #[test]
    fn test_harbinger_topdecks_from_discard() {
        let mut game = game();
        set_hand(&mut game, 0, &[CardId::Harbinger]);
        game.players[0].discard = CardPile::from_cards(vec![CardId::Estate, CardId::Gold]);
        game.play_card(0, 0).unwrap();
        game.resolve_interaction(0, Selection::Cards(vec![1])).unwrap();
        assert_eq!(game.players[0].deck.peek_top(), Some(CardId::Gold));
        assert_eq!(game.players[0].discard.as_slice(), &[CardId::Estate]);
    }
}
