//! Shared supply piles

use crate::core::catalog::{self, BASIC_CARDS, ENDGAME_PILES, KINGDOM_PILE_SIZE};
use crate::core::CardId;
use crate::game::interaction::CardFilter;
use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Remaining copies per pile
///
/// Piles keep their setup order (basics first, then kingdom) so the supply
/// serializes and displays the same way on every peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Supply {
    counts: FxHashMap<CardId, u32>,
    order: Vec<CardId>,
}

impl Supply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard setup for `players` players and the given kingdom
    pub fn for_game(players: usize, kingdom: &[CardId]) -> Self {
        let n = players as u32;
        let victory = if players > 2 { 12 } else { 8 };
        let mut supply = Supply::new();
        for id in BASIC_CARDS {
            let count = match id {
                CardId::Copper => 60u32.saturating_sub(7 * n),
                CardId::Silver => 40,
                CardId::Gold => 30,
                CardId::Estate | CardId::Duchy | CardId::Province => victory,
                CardId::Curse => 10 * n.saturating_sub(1),
                _ => 0,
            };
            supply.insert(id, count);
        }
        for &id in kingdom {
            supply.insert(id, KINGDOM_PILE_SIZE);
        }
        supply
    }

    /// Add or overwrite a pile
    pub fn insert(&mut self, card: CardId, count: u32) {
        if self.counts.insert(card, count).is_none() {
            self.order.push(card);
        }
    }

    /// Remaining copies (0 for cards not in this supply)
    pub fn count(&self, card: CardId) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.counts.contains_key(&card)
    }

    /// Remove one copy; false when the pile is empty or absent
    pub fn take(&mut self, card: CardId) -> bool {
        match self.counts.get_mut(&card) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Piles in setup order with their counts
    pub fn iter(&self) -> impl Iterator<Item = (CardId, u32)> + '_ {
        self.order.iter().map(move |id| (*id, self.count(*id)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Kingdom piles in setup order
    pub fn kingdom(&self) -> Vec<CardId> {
        self.order
            .iter()
            .copied()
            .filter(|id| catalog::is_kingdom(*id))
            .collect()
    }

    pub fn empty_piles(&self) -> usize {
        self.counts.values().filter(|&&c| c == 0).count()
    }

    /// Non-empty piles whose card passes `filter`
    pub fn eligible(&self, filter: &CardFilter) -> Vec<CardId> {
        self.iter()
            .filter(|(id, count)| *count > 0 && filter.matches(*id))
            .map(|(id, _)| id)
            .collect()
    }

    /// Why the supply ends the game, if it does
    pub fn exhaustion(&self) -> Option<GameEndReason> {
        for pile in ENDGAME_PILES {
            if self.contains(pile) && self.count(pile) == 0 {
                return Some(GameEndReason::PileExhausted(pile));
            }
        }
        if self.empty_piles() >= 3 {
            return Some(GameEndReason::ThreePilesEmpty);
        }
        None
    }
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    /// A designated victory pile ran out
    PileExhausted(CardId),
    ThreePilesEmpty,
    /// The driver stopped at its turn limit
    TurnLimit,
    /// The driver gave up after repeated illegal decisions
    Stalled,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::PileExhausted(card) => write!(f, "the {} pile is empty", card),
            GameEndReason::ThreePilesEmpty => write!(f, "three supply piles are empty"),
            GameEndReason::TurnLimit => write!(f, "turn limit reached"),
            GameEndReason::Stalled => write!(f, "no legal progress"),
        }
    }
}

impl Serialize for Supply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (id, count) in self.iter() {
            map.serialize_entry(&id, &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Supply {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SupplyVisitor;

        impl<'de> Visitor<'de> for SupplyVisitor {
            type Value = Supply;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of card id to pile count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Supply, A::Error> {
                let mut supply = Supply::new();
                while let Some((id, count)) = access.next_entry::<CardId, u32>()? {
                    supply.insert(id, count);
                }
                Ok(supply)
            }
        }

        deserializer.deserialize_map(SupplyVisitor)
    }
}
