//! Card zones (deck, hand, play area, discard, trash)

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// An ordered pile of cards
///
/// For draw piles the top of the pile is the END of the vector, so drawing
/// is a `pop`. Hands keep insertion order because selections are by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardPile {
    cards: Vec<CardId>,
}

impl CardPile {
    pub fn new() -> Self {
        CardPile { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<CardId>) -> Self {
        CardPile { cards }
    }

    pub fn add(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    /// Remove the first copy of `card`
    pub fn remove(&mut self, card: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card) {
            // Keep order: hands are addressed by index
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove the most recently added copy of `card`
    pub fn remove_last(&mut self, card: CardId) -> bool {
        if let Some(pos) = self.cards.iter().rposition(|&id| id == card) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<CardId> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Remove several positions at once; out-of-range indices are ignored
    ///
    /// Returned cards are in ascending index order.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<CardId> {
        let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < self.cards.len()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        let mut removed = Vec::with_capacity(sorted.len());
        for &i in sorted.iter().rev() {
            removed.push(self.cards.remove(i));
        }
        removed.reverse();
        removed
    }

    pub fn get(&self, index: usize) -> Option<CardId> {
        self.cards.get(index).copied()
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn count(&self, card: CardId) -> usize {
        self.cards.iter().filter(|&&id| id == card).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardId> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    /// Draw from top
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Put a card on top
    pub fn add_to_top(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Empty the pile, returning its cards in order
    pub fn take_all(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl<'a> IntoIterator for &'a CardPile {
    type Item = &'a CardId;
    type IntoIter = std::slice::Iter<'a, CardId>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_basics() {
        let mut pile = CardPile::new();
        assert!(pile.is_empty());

        pile.add(CardId::Copper);
        pile.add(CardId::Estate);
        pile.add(CardId::Copper);

        assert_eq!(pile.len(), 3);
        assert_eq!(pile.count(CardId::Copper), 2);
        assert!(pile.remove(CardId::Copper));
        assert_eq!(pile.as_slice(), &[CardId::Estate, CardId::Copper]);
        assert!(!pile.remove(CardId::Gold));
    }

    #[test]
    fn test_draw_from_top() {
        let mut deck = CardPile::from_cards(vec![CardId::Copper, CardId::Silver, CardId::Gold]);

        assert_eq!(deck.peek_top(), Some(CardId::Gold));
        assert_eq!(deck.draw_top(), Some(CardId::Gold));
        deck.add_to_top(CardId::Province);
        assert_eq!(deck.draw_top(), Some(CardId::Province));
        assert_eq!(deck.draw_top(), Some(CardId::Silver));
        assert_eq!(deck.draw_top(), Some(CardId::Copper));
        assert_eq!(deck.draw_top(), None);
    }

    #[test]
    fn test_remove_indices_keeps_order() {
        let mut hand = CardPile::from_cards(vec![
            CardId::Copper,
            CardId::Estate,
            CardId::Silver,
            CardId::Village,
        ]);
        let removed = hand.remove_indices(&[3, 1, 9, 1]);
        assert_eq!(removed, vec![CardId::Estate, CardId::Village]);
        assert_eq!(hand.as_slice(), &[CardId::Copper, CardId::Silver]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let pile = CardPile::from_cards(vec![CardId::Copper, CardId::ThroneRoom]);
        let json = serde_json::to_string(&pile).unwrap();
        assert_eq!(json, r#"["copper","throne_room"]"#);
    }
}
