//! Card identities and definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Treasure,
    Victory,
    Action,
    Reaction,
    Curse,
}

impl CardType {
    /// Action and Reaction cards share the action rules (phase, action count, multiplier)
    pub fn is_action(&self) -> bool {
        matches!(self, CardType::Action | CardType::Reaction)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardType::Treasure => "Treasure",
            CardType::Victory => "Victory",
            CardType::Action => "Action",
            CardType::Reaction => "Reaction",
            CardType::Curse => "Curse",
        };
        f.write_str(s)
    }
}

/// Stable card identity
///
/// Physical copies of a card are interchangeable: zones hold `CardId`s and
/// two copies compare equal by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    // Basic cards
    Copper,
    Silver,
    Gold,
    Estate,
    Duchy,
    Province,
    Curse,

    // Kingdom cards
    Artisan,
    Bandit,
    Bureaucrat,
    Cellar,
    Chapel,
    CouncilRoom,
    Festival,
    Gardens,
    Harbinger,
    Laboratory,
    Library,
    Market,
    Merchant,
    Militia,
    Mine,
    Moat,
    Moneylender,
    Poacher,
    Remodel,
    Sentry,
    Smithy,
    ThroneRoom,
    Vassal,
    Village,
    Witch,
    Workshop,
}

impl CardId {
    /// Static definition for this card
    pub fn def(self) -> &'static CardDef {
        crate::core::catalog::definition(self)
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn cost(self) -> u32 {
        self.def().cost
    }

    pub fn card_type(self) -> CardType {
        self.def().card_type
    }

    pub fn is_action(self) -> bool {
        self.card_type().is_action()
    }

    pub fn is_treasure(self) -> bool {
        self.card_type() == CardType::Treasure
    }

    pub fn is_victory(self) -> bool {
        self.card_type() == CardType::Victory
    }

    /// The snake_case id used on the wire and in board setups
    pub fn as_str(self) -> &'static str {
        self.def().key
    }

    /// Parse a snake_case id (e.g. "council_room")
    pub fn from_key(key: &str) -> Option<CardId> {
        crate::core::catalog::ALL_CARDS
            .iter()
            .copied()
            .find(|id| id.as_str() == key)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable card definition
///
/// Numeric effect fields are zero when a card has no such effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDef {
    pub id: CardId,
    /// Wire id ("throne_room")
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    pub cost: u32,
    pub card_type: CardType,
    /// Coins when played as a Treasure
    pub value: u32,
    /// Victory points (negative for curses)
    pub points: i32,
    pub actions: u32,
    pub cards: u32,
    pub buys: u32,
    /// Virtual coins added for the turn when played as an Action
    pub gold: u32,
    pub description: &'static str,
}

impl CardDef {
    /// Baseline definition with every numeric effect cleared
    pub const fn new(
        id: CardId,
        key: &'static str,
        name: &'static str,
        cost: u32,
        card_type: CardType,
        description: &'static str,
    ) -> Self {
        CardDef {
            id,
            key,
            name,
            cost,
            card_type,
            value: 0,
            points: 0,
            actions: 0,
            cards: 0,
            buys: 0,
            gold: 0,
            description,
        }
    }

    pub const fn value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub const fn points(mut self, points: i32) -> Self {
        self.points = points;
        self
    }

    pub const fn actions(mut self, actions: u32) -> Self {
        self.actions = actions;
        self
    }

    pub const fn cards(mut self, cards: u32) -> Self {
        self.cards = cards;
        self
    }

    pub const fn buys(mut self, buys: u32) -> Self {
        self.buys = buys;
        self
    }

    pub const fn gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }
}
