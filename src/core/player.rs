//! Player representation

use crate::core::catalog;
use crate::core::CardId;
use crate::zones::CardPile;
use serde::{Deserialize, Serialize};

/// Turn-scoped baseline restored at cleanup
pub const BASE_ACTIONS: u32 = 1;
pub const BASE_BUYS: u32 = 1;
pub const HAND_SIZE: usize = 5;

/// Represents a player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Seat index
    pub id: usize,

    pub name: String,

    /// Draw pile (top = end)
    pub deck: CardPile,

    /// Ordered hand; selections address it by index
    pub hand: CardPile,

    pub discard: CardPile,

    /// Cards played this turn
    pub play_area: CardPile,

    pub actions: u32,
    pub buys: u32,

    /// Spending power accumulated this turn
    pub gold: u32,
}

impl Player {
    /// Fresh player with the unshuffled starting deck and empty hand
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            deck: CardPile::from_cards(catalog::starting_deck()),
            hand: CardPile::new(),
            discard: CardPile::new(),
            play_area: CardPile::new(),
            actions: BASE_ACTIONS,
            buys: BASE_BUYS,
            gold: 0,
        }
    }

    /// Draw up to `count` cards into hand, reshuffling the discard pile into
    /// the deck whenever the deck runs out.
    ///
    /// Returns how many cards were actually drawn; drawing from an empty deck
    /// and empty discard simply stops short.
    pub fn draw(&mut self, count: usize, rng: &mut impl rand::Rng) -> usize {
        let mut drawn = 0;
        while drawn < count {
            match self.draw_one(rng) {
                Some(card) => {
                    self.hand.add(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Take the top card of the deck, reshuffling discard if needed
    pub fn draw_one(&mut self, rng: &mut impl rand::Rng) -> Option<CardId> {
        if self.deck.is_empty() {
            self.reshuffle(rng);
        }
        self.deck.draw_top()
    }

    /// Move the whole discard pile into the deck and shuffle it
    pub fn reshuffle(&mut self, rng: &mut impl rand::Rng) {
        if self.discard.is_empty() {
            return;
        }
        let cards = self.discard.take_all();
        self.deck.extend(cards);
        self.deck.shuffle(rng);
    }

    /// Reset the turn-scoped counters
    pub fn reset_resources(&mut self) {
        self.actions = BASE_ACTIONS;
        self.buys = BASE_BUYS;
        self.gold = 0;
    }

    /// Every card the player owns across all zones
    pub fn all_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.play_area.iter())
            .copied()
    }

    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.play_area.len()
    }

    pub fn count_owned(&self, card: CardId) -> usize {
        self.all_cards().filter(|&c| c == card).count()
    }

    /// Hand indices holding cards that match `pred`
    pub fn hand_indices_where(&self, pred: impl Fn(CardId) -> bool) -> Vec<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter(|&(_, &c)| pred(c))
            .map(|(i, _)| i)
            .collect()
    }
}
